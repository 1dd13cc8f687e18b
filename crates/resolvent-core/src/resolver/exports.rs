//! Exports-map evaluation.
//!
//! Covers exact subpath keys, single-`*` pattern keys with specificity
//! ordering, and condition maps walked in the active preference order.
//! The exports map is authoritative: a subpath it does not cover never
//! falls back to legacy fields.

use crate::config::BuildConfig;
use crate::manifest::{ConditionMap, ExportTarget, ExportsMap, PackageDescriptor};

use super::error::ResolveError;
use super::request::ImportRequest;
use super::resolve::{Mechanism, Resolution};
use super::trace::{steps, warning_codes, ResolveTrace, TraceStep, TraceWarning};

/// Resolve a request against the package's exports map.
pub(super) fn resolve_exports(
    pkg: &PackageDescriptor,
    exports: &ExportsMap,
    request: &ImportRequest,
    config: &BuildConfig,
    trace: &mut ResolveTrace,
) -> Result<Resolution, ResolveError> {
    // Exact key match always beats pattern keys.
    if let Some(target) = exports.get(&request.subpath) {
        trace.add_step(
            TraceStep::new(
                steps::MATCH_EXPORTS_KEY,
                true,
                format!("Exact key match for {:?}", request.subpath),
            )
            .with_key(&request.subpath),
        );
        return resolve_target(pkg, exports, target, request, config, None, trace);
    }

    if let Some(matched) = best_pattern_match(exports, &request.subpath) {
        trace.add_step(
            TraceStep::new(
                steps::MATCH_EXPORTS_KEY,
                true,
                format!(
                    "Pattern key {:?} matched with star {:?}",
                    matched.key, matched.star
                ),
            )
            .with_key(matched.key),
        );
        return resolve_target(pkg, exports, matched.target, request, config, Some(&matched), trace);
    }

    trace.failure(
        steps::MATCH_EXPORTS_KEY,
        format!("No exports key covers {:?}", request.subpath),
    );
    Err(subpath_not_exported(pkg, exports, request))
}

/// A pattern key that matched the requested subpath.
struct PatternMatch<'a> {
    key: &'a str,
    target: &'a ExportTarget,
    star: String,
}

/// Find the most specific pattern key covering `subpath`.
///
/// Pattern keys contain exactly one `*`. Specificity is longest key
/// first, lexicographic on ties.
fn best_pattern_match<'a>(exports: &'a ExportsMap, subpath: &str) -> Option<PatternMatch<'a>> {
    let mut matches: Vec<(&str, &ExportTarget, String)> = Vec::new();

    for (key, target) in exports.iter() {
        if key.chars().filter(|&c| c == '*').count() != 1 {
            continue;
        }
        if !key.starts_with("./") {
            continue;
        }
        if let Some(star) = match_pattern(key, subpath) {
            matches.push((key, target, star));
        }
    }

    matches.sort_by(|a, b| {
        let len_cmp = b.0.len().cmp(&a.0.len());
        if len_cmp == std::cmp::Ordering::Equal {
            a.0.cmp(b.0)
        } else {
            len_cmp
        }
    });

    matches
        .into_iter()
        .next()
        .map(|(key, target, star)| PatternMatch { key, target, star })
}

/// Match a pattern key against a subpath.
///
/// Returns the `*` substitution value if matched. E.g. pattern
/// `"./features/*"` with subpath `"./features/foo"` returns `Some("foo")`.
/// Empty star values are rejected.
fn match_pattern(pattern: &str, subpath: &str) -> Option<String> {
    let star_pos = pattern.find('*')?;

    let prefix = &pattern[..star_pos];
    let suffix = &pattern[star_pos + 1..];

    if !subpath.starts_with(prefix) {
        return None;
    }

    if !suffix.is_empty() && !subpath.ends_with(suffix) {
        return None;
    }

    let start = prefix.len();
    let end = subpath.len() - suffix.len();

    if start > end {
        return None;
    }

    let star = &subpath[start..end];
    if star.is_empty() {
        return None;
    }

    Some(star.to_string())
}

/// Substitute `*` in a leaf target with the matched star value.
///
/// Returns None if the target does not contain exactly one `*`, if the
/// result no longer starts with `"./"`, or if it contains a `".."`
/// segment escaping the package root.
fn substitute_star(target: &str, star: &str) -> Option<String> {
    if target.chars().filter(|&c| c == '*').count() != 1 {
        return None;
    }

    let result = target.replace('*', star);

    if !result.starts_with("./") {
        return None;
    }

    if result.split('/').any(|segment| segment == "..") {
        return None;
    }

    Some(result)
}

/// Resolve a matched target: a literal path, or a condition map walked
/// in the active order. Pattern star substitution happens last, on the
/// selected leaf path.
fn resolve_target(
    pkg: &PackageDescriptor,
    exports: &ExportsMap,
    target: &ExportTarget,
    request: &ImportRequest,
    config: &BuildConfig,
    pattern: Option<&PatternMatch<'_>>,
    trace: &mut ResolveTrace,
) -> Result<Resolution, ResolveError> {
    let (leaf, condition) = match target {
        ExportTarget::Path(path) => (path.clone(), None),
        ExportTarget::Conditions(conditions) => {
            let (path, name) = resolve_conditions(pkg, conditions, request, config, trace)?;
            (path, Some(name))
        }
    };

    let resolved = match pattern {
        Some(matched) => match substitute_star(&leaf, &matched.star) {
            Some(path) => {
                trace.add_step(
                    TraceStep::new(
                        steps::EXPAND_PATTERN,
                        true,
                        format!("Substituted {:?} into {leaf:?}", matched.star),
                    )
                    .with_target(&path),
                );
                path
            }
            None => {
                trace.failure(
                    steps::EXPAND_PATTERN,
                    format!("Cannot substitute {:?} into target {leaf:?}", matched.star),
                );
                return Err(subpath_not_exported(pkg, exports, request));
            }
        },
        None => leaf,
    };

    Ok(Resolution {
        target: resolved,
        mechanism: Mechanism::Exports,
        condition,
    })
}

/// Walk the active condition order over a condition map.
///
/// The first condition name present as a key wins and resolution
/// commits to it: a dead end inside the committed branch propagates
/// rather than resuming with later siblings. `"default"` matches
/// unconditionally, even when an explicit order override omits it.
///
/// Returns the selected leaf path and the condition name that chose it
/// (the innermost name, for nested maps).
fn resolve_conditions(
    pkg: &PackageDescriptor,
    conditions: &ConditionMap,
    request: &ImportRequest,
    config: &BuildConfig,
    trace: &mut ResolveTrace,
) -> Result<(String, String), ResolveError> {
    let order = config.condition_order();

    let Some((name, target)) = first_match(conditions, &order) else {
        trace.failure(
            steps::RESOLVE_CONDITION,
            format!(
                "No condition in {order:?} matched (declared: {:?})",
                conditions.keys().collect::<Vec<_>>()
            ),
        );
        return Err(ResolveError::NoMatchingCondition {
            package: pkg.name.clone(),
            subpath: request.subpath.clone(),
            tried: order.iter().map(ToString::to_string).collect(),
            available: conditions.keys().cloned().collect(),
        });
    };

    trace.add_step(
        TraceStep::new(
            steps::RESOLVE_CONDITION,
            true,
            format!("Condition {name:?} matched"),
        )
        .with_condition(name),
    );
    if name == "default" {
        trace.add_warning(TraceWarning::new(
            warning_codes::DEFAULT_CONDITION,
            format!("No listed condition matched for {:?}; used \"default\"", request.subpath),
        ));
    }

    match target {
        ExportTarget::Path(path) => Ok((path.clone(), name.to_string())),
        ExportTarget::Conditions(nested) => resolve_conditions(pkg, nested, request, config, trace),
    }
}

/// The first condition in the active order with a key in the map, or
/// the `"default"` entry when the walk finds nothing.
fn first_match<'a>(
    conditions: &'a ConditionMap,
    order: &[&str],
) -> Option<(&'a str, &'a ExportTarget)> {
    for name in order {
        if let Some((key, target)) = conditions.get_key_value(*name) {
            return Some((key.as_str(), target));
        }
    }
    conditions
        .get_key_value("default")
        .map(|(key, target)| (key.as_str(), target))
}

fn subpath_not_exported(
    pkg: &PackageDescriptor,
    exports: &ExportsMap,
    request: &ImportRequest,
) -> ResolveError {
    ResolveError::SubpathNotExported {
        package: pkg.name.clone(),
        subpath: request.subpath.clone(),
        available: exports.keys().map(str::to_string).collect(),
    }
}
