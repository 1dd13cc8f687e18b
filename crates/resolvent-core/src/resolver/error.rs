use thiserror::Error;

/// Why a resolution failed.
///
/// Each kind is a distinct, recoverable-by-caller outcome with a stable
/// machine code. The resolver never falls back past these boundaries:
/// an exports lookup that fails must not silently consult `main`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The package declares an exports map, but no key covers the
    /// requested subpath.
    #[error("subpath {subpath:?} is not exported by package {package:?}")]
    SubpathNotExported {
        package: String,
        subpath: String,
        /// Export keys the package does declare.
        available: Vec<String>,
    },

    /// A condition map was reached, but no condition in the active
    /// order (nor `"default"`) matched.
    #[error("no condition matched for {subpath:?} in package {package:?} (tried {tried:?}, declared {available:?})")]
    NoMatchingCondition {
        package: String,
        subpath: String,
        /// The active condition order that was walked.
        tried: Vec<String>,
        /// Condition names declared in the map that failed.
        available: Vec<String>,
    },

    /// A deep import was requested from a package without an exports
    /// map. Legacy fields only describe the root entry.
    #[error("deep import {subpath:?} into package {package:?} requires an exports map")]
    DeepImportRequiresExports { package: String, subpath: String },

    /// The legacy branch exhausted the main-field order with no field
    /// present.
    #[error("package {package:?} declares no usable entry point (tried fields {tried:?})")]
    NoEntryPoint {
        package: String,
        /// The main-field order that was walked.
        tried: Vec<String>,
    },
}

impl ResolveError {
    /// Stable machine-readable code for this failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SubpathNotExported { .. } => codes::SUBPATH_NOT_EXPORTED,
            Self::NoMatchingCondition { .. } => codes::NO_MATCHING_CONDITION,
            Self::DeepImportRequiresExports { .. } => codes::DEEP_IMPORT_REQUIRES_EXPORTS,
            Self::NoEntryPoint { .. } => codes::NO_ENTRY_POINT,
        }
    }
}

/// Stable failure codes for machine-readable output.
pub mod codes {
    pub const SUBPATH_NOT_EXPORTED: &str = "SUBPATH_NOT_EXPORTED";
    pub const NO_MATCHING_CONDITION: &str = "NO_MATCHING_CONDITION";
    pub const DEEP_IMPORT_REQUIRES_EXPORTS: &str = "DEEP_IMPORT_REQUIRES_EXPORTS";
    pub const NO_ENTRY_POINT: &str = "NO_ENTRY_POINT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_uppercase() {
        let all = [
            codes::SUBPATH_NOT_EXPORTED,
            codes::NO_MATCHING_CONDITION,
            codes::DEEP_IMPORT_REQUIRES_EXPORTS,
            codes::NO_ENTRY_POINT,
        ];
        for code in all {
            assert!(
                code.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "code {code} must be SCREAMING_SNAKE"
            );
        }
    }

    #[test]
    fn test_code_matches_variant() {
        let err = ResolveError::DeepImportRequiresExports {
            package: "pkg".to_string(),
            subpath: "./deep".to_string(),
        };
        assert_eq!(err.code(), "DEEP_IMPORT_REQUIRES_EXPORTS");
    }

    #[test]
    fn test_display_names_the_subpath() {
        let err = ResolveError::SubpathNotExported {
            package: "ui-kit".to_string(),
            subpath: "./card".to_string(),
            available: vec![".".to_string(), "./button".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("./card"));
        assert!(message.contains("ui-kit"));
    }
}
