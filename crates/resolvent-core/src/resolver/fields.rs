//! Legacy main-field evaluation.
//!
//! Applies only when the package declares no exports map, and only for
//! the root subpath: without a declared map there is no authoritative
//! way to know a deep path is publicly supported.

use crate::config::BuildConfig;
use crate::manifest::PackageDescriptor;

use super::error::ResolveError;
use super::request::ImportRequest;
use super::resolve::{Mechanism, Resolution};
use super::trace::{steps, warning_codes, ResolveTrace, TraceStep, TraceWarning};

/// Resolve a request using the legacy `main`/`module`/`browser` fields.
pub(super) fn resolve_legacy(
    pkg: &PackageDescriptor,
    request: &ImportRequest,
    config: &BuildConfig,
    trace: &mut ResolveTrace,
) -> Result<Resolution, ResolveError> {
    if !request.is_root() {
        trace.failure(
            steps::RESOLVE_MAIN_FIELD,
            format!("Deep import {:?} cannot use legacy fields", request.subpath),
        );
        return Err(ResolveError::DeepImportRequiresExports {
            package: pkg.name.clone(),
            subpath: request.subpath.clone(),
        });
    }

    let order = config.main_field_order();

    for field in order {
        match pkg.legacy_field(*field) {
            Some(path) if !path.is_empty() => {
                trace.add_step(
                    TraceStep::new(
                        steps::RESOLVE_MAIN_FIELD,
                        true,
                        format!("Field {:?} selected", field.as_str()),
                    )
                    .with_key(field.as_str())
                    .with_target(path),
                );
                return Ok(Resolution {
                    target: path.to_string(),
                    mechanism: Mechanism::MainField(*field),
                    condition: None,
                });
            }
            Some(_) => {
                trace.failure(
                    steps::RESOLVE_MAIN_FIELD,
                    format!("Field {:?} is declared but empty", field.as_str()),
                );
                trace.add_warning(TraceWarning::new(
                    warning_codes::EMPTY_MAIN_FIELD,
                    format!("Field {:?} is declared but empty; skipped", field.as_str()),
                ));
            }
            None => {
                trace.failure(
                    steps::RESOLVE_MAIN_FIELD,
                    format!("Field {:?} not declared", field.as_str()),
                );
            }
        }
    }

    let tried: Vec<String> = order.iter().map(|f| f.as_str().to_string()).collect();
    Err(ResolveError::NoEntryPoint {
        package: pkg.name.clone(),
        tried,
    })
}
