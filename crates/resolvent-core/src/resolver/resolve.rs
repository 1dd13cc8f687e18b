//! Resolution entry points.

use serde::Serialize;
use tracing::debug;

use crate::config::{BuildConfig, MainField};
use crate::manifest::PackageDescriptor;

use super::error::ResolveError;
use super::exports::resolve_exports;
use super::fields::resolve_legacy;
use super::request::ImportRequest;
use super::trace::{steps, warning_codes, ResolveTrace, TraceStep, TraceWarning};

/// A successful resolution: the target file and how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Package-relative target path (starts with `"./"`).
    pub target: String,
    /// Which declaration mechanism produced the target.
    pub mechanism: Mechanism,
    /// The condition name that selected the target, when a condition
    /// map was involved (innermost name for nested maps).
    pub condition: Option<String>,
}

/// Which declaration mechanism produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanism {
    /// The exports map.
    Exports,
    /// One of the legacy entry-point fields.
    MainField(MainField),
}

impl Mechanism {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exports => "exports",
            Self::MainField(_) => "main-field",
        }
    }

    /// The legacy field, when that mechanism applied.
    #[must_use]
    pub fn field(&self) -> Option<MainField> {
        match self {
            Self::Exports => None,
            Self::MainField(field) => Some(*field),
        }
    }
}

impl Serialize for Mechanism {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of a traced resolution.
#[derive(Debug, Clone)]
pub struct TracedResolution {
    /// The resolution outcome.
    pub outcome: Result<Resolution, ResolveError>,
    /// The step-by-step trace.
    pub trace: ResolveTrace,
}

/// Resolve one import request against a package descriptor.
///
/// Pure and deterministic: identical arguments always produce the
/// identical result. The import/require syntax at the call site is not
/// an input; only the config's platform, format, and overrides decide.
pub fn resolve(
    pkg: &PackageDescriptor,
    request: &ImportRequest,
    config: &BuildConfig,
) -> Result<Resolution, ResolveError> {
    let mut trace = ResolveTrace::new();
    resolve_inner(pkg, request, config, &mut trace)
}

/// Resolve with a step-by-step trace for diagnostics.
///
/// Always agrees with [`resolve`] on the outcome.
#[must_use]
pub fn resolve_with_trace(
    pkg: &PackageDescriptor,
    request: &ImportRequest,
    config: &BuildConfig,
) -> TracedResolution {
    let mut trace = ResolveTrace::new();
    let outcome = resolve_inner(pkg, request, config, &mut trace);
    TracedResolution { outcome, trace }
}

fn resolve_inner(
    pkg: &PackageDescriptor,
    request: &ImportRequest,
    config: &BuildConfig,
    trace: &mut ResolveTrace,
) -> Result<Resolution, ResolveError> {
    let outcome = match &pkg.exports {
        Some(exports) => {
            trace.success(steps::SELECT_BRANCH, "Package declares an exports map");
            resolve_exports(pkg, exports, request, config, trace)
        }
        None => {
            trace.success(steps::SELECT_BRANCH, "No exports map; legacy fields apply");
            trace.add_warning(TraceWarning::new(
                warning_codes::LEGACY_RESOLUTION,
                format!(
                    "Package {:?} declares no exports map; resolved via legacy fields",
                    pkg.name
                ),
            ));
            resolve_legacy(pkg, request, config, trace)
        }
    };

    match &outcome {
        Ok(resolution) => {
            trace.add_step(
                TraceStep::new(
                    steps::FINAL_TARGET,
                    true,
                    format!("Resolved via {}", resolution.mechanism.as_str()),
                )
                .with_target(&resolution.target),
            );
            debug!(
                package = %pkg.name,
                subpath = %request.subpath,
                target = %resolution.target,
                mechanism = resolution.mechanism.as_str(),
                "resolved entry point"
            );
        }
        Err(err) => {
            debug!(
                package = %pkg.name,
                subpath = %request.subpath,
                code = err.code(),
                "resolution failed"
            );
        }
    }

    outcome
}
