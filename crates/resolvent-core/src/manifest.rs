//! Package manifest model and ingestion.
//!
//! Builds a typed [`PackageDescriptor`] from a parsed `package.json`,
//! normalizing the exports shorthand shapes the ecosystem publishes and
//! validating keys and targets up front. The resolver assumes input that
//! passed this boundary.

use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::config::MainField;
use crate::error::Error;

/// One dependency's published entry-point metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package name as declared in the manifest.
    pub name: String,
    /// The `exports` map, if declared. When present it is authoritative
    /// for every subpath; legacy fields below are never consulted.
    pub exports: Option<ExportsMap>,
    /// Legacy `main` field.
    pub main: Option<String>,
    /// Legacy `module` field.
    pub module: Option<String>,
    /// Legacy `browser` field (string form only).
    pub browser: Option<String>,
}

impl PackageDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_exports(mut self, exports: ExportsMap) -> Self {
        self.exports = Some(exports);
        self
    }

    #[must_use]
    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = Some(main.into());
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    #[must_use]
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    /// The value of one legacy entry-point field.
    #[must_use]
    pub fn legacy_field(&self, field: MainField) -> Option<&str> {
        match field {
            MainField::Browser => self.browser.as_deref(),
            MainField::Module => self.module.as_deref(),
            MainField::Main => self.main.as_deref(),
        }
    }

    /// Build a descriptor from a parsed manifest.
    ///
    /// Normalizes the exports shorthand shapes:
    /// - `"exports": "./index.js"` becomes `{ ".": "./index.js" }`
    /// - `"exports": { "import": ..., "require": ... }` (no subpath keys
    ///   at all) becomes `{ ".": { "import": ..., "require": ... } }`
    ///
    /// A `null` exports value counts as absent. Legacy fields are taken
    /// as strings only; any other shape is treated as absent.
    pub fn from_json(manifest: &Value) -> Result<Self, ExportsShapeError> {
        let name = manifest
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let exports = match manifest.get("exports") {
            None | Some(Value::Null) => None,
            Some(value) => Some(ExportsMap::from_value(value)?),
        };

        Ok(Self {
            name,
            exports,
            main: string_field(manifest, "main"),
            module: string_field(manifest, "module"),
            browser: string_field(manifest, "browser"),
        })
    }
}

/// Ordered map from condition name to target.
pub type ConditionMap = IndexMap<String, ExportTarget>;

/// The value side of an exports entry: a literal file path, or a nested
/// condition map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Path(String),
    Conditions(ConditionMap),
}

/// Ordered map from export key (`"."` or `"./..."`) to target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportsMap {
    entries: IndexMap<String, ExportTarget>,
}

impl ExportsMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, target: ExportTarget) {
        self.entries.insert(key.into(), target);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ExportTarget> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportTarget)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a raw `exports` value.
    ///
    /// Accepts the string shorthand, a subpath-keyed object, or a root
    /// condition object. Anything else is a shape error.
    pub fn from_value(value: &Value) -> Result<Self, ExportsShapeError> {
        match value {
            Value::String(target) => {
                validate_target(".", target)?;
                let mut entries = IndexMap::new();
                entries.insert(".".to_string(), ExportTarget::Path(target.clone()));
                Ok(Self { entries })
            }
            Value::Object(map) => {
                let subpath_keys = map.keys().filter(|k| k.starts_with('.')).count();

                // Root condition object: every key is a condition name.
                if subpath_keys == 0 && !map.is_empty() {
                    let conditions = condition_map_from_object(map)?;
                    let mut entries = IndexMap::new();
                    entries.insert(".".to_string(), ExportTarget::Conditions(conditions));
                    return Ok(Self { entries });
                }

                if subpath_keys != map.len() {
                    return Err(ExportsShapeError::MixedKeys);
                }

                let mut entries = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    if key != "." && !key.starts_with("./") {
                        return Err(ExportsShapeError::InvalidKey { key: key.clone() });
                    }
                    entries.insert(key.clone(), target_from_value(key, value)?);
                }
                Ok(Self { entries })
            }
            other => Err(ExportsShapeError::UnsupportedShape {
                found: json_type_name(other),
            }),
        }
    }
}

/// Shape violations in an `exports` value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportsShapeError {
    #[error("unsupported exports shape: expected a string or object, found {found}")]
    UnsupportedShape { found: &'static str },

    #[error("exports object mixes subpath keys with condition names")]
    MixedKeys,

    #[error("invalid export key {key:?}: keys must be \".\" or start with \"./\"")]
    InvalidKey { key: String },

    #[error("invalid condition name {name:?}: condition names must not start with \".\"")]
    InvalidConditionName { name: String },

    #[error("invalid export target {target:?} under {key:?}: targets must start with \"./\"")]
    InvalidTarget { key: String, target: String },
}

fn target_from_value(key: &str, value: &Value) -> Result<ExportTarget, ExportsShapeError> {
    match value {
        Value::String(target) => {
            validate_target(key, target)?;
            Ok(ExportTarget::Path(target.clone()))
        }
        Value::Object(map) => Ok(ExportTarget::Conditions(condition_map_from_object(map)?)),
        other => Err(ExportsShapeError::UnsupportedShape {
            found: json_type_name(other),
        }),
    }
}

fn condition_map_from_object(
    map: &serde_json::Map<String, Value>,
) -> Result<ConditionMap, ExportsShapeError> {
    let mut conditions = ConditionMap::with_capacity(map.len());
    for (name, value) in map {
        // Subpath keys are only valid at the top level of the map.
        if name.starts_with('.') {
            return Err(ExportsShapeError::InvalidConditionName { name: name.clone() });
        }
        conditions.insert(name.clone(), target_from_value(name, value)?);
    }
    Ok(conditions)
}

fn validate_target(key: &str, target: &str) -> Result<(), ExportsShapeError> {
    if target.starts_with("./") {
        Ok(())
    } else {
        Err(ExportsShapeError::InvalidTarget {
            key: key.to_string(),
            target: target.to_string(),
        })
    }
}

fn string_field(manifest: &Value, field: &str) -> Option<String> {
    manifest
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read and parse a manifest file into a descriptor.
///
/// The resolver itself performs no I/O; this helper exists at the crate
/// edge for callers that start from a path on disk.
pub fn read_descriptor(path: &Path) -> Result<PackageDescriptor, Error> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: Value = serde_json::from_str(&raw).map_err(|source| Error::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;
    PackageDescriptor::from_json(&manifest).map_err(|source| Error::ManifestExports {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_shorthand_normalizes_to_root_key() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": "./dist/index.js"
        }))
        .unwrap();

        let exports = pkg.exports.unwrap();
        assert_eq!(exports.len(), 1);
        assert_eq!(
            exports.get("."),
            Some(&ExportTarget::Path("./dist/index.js".to_string()))
        );
    }

    #[test]
    fn test_root_condition_object_normalizes_to_root_key() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": {
                "import": "./esm.js",
                "require": "./cjs.js"
            }
        }))
        .unwrap();

        let exports = pkg.exports.unwrap();
        match exports.get(".") {
            Some(ExportTarget::Conditions(conditions)) => {
                assert_eq!(
                    conditions.get("import"),
                    Some(&ExportTarget::Path("./esm.js".to_string()))
                );
                assert_eq!(
                    conditions.get("require"),
                    Some(&ExportTarget::Path("./cjs.js".to_string()))
                );
            }
            other => panic!("expected root conditions, got {other:?}"),
        }
    }

    #[test]
    fn test_subpath_keyed_map_kept_as_is() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": {
                ".": "./index.js",
                "./feature": { "import": "./esm/feature.js" }
            }
        }))
        .unwrap();

        let exports = pkg.exports.unwrap();
        assert_eq!(exports.len(), 2);
        assert!(matches!(exports.get("."), Some(ExportTarget::Path(_))));
        assert!(matches!(
            exports.get("./feature"),
            Some(ExportTarget::Conditions(_))
        ));
    }

    #[test]
    fn test_mixed_keys_rejected() {
        let err = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": {
                ".": "./index.js",
                "import": "./esm.js"
            }
        }))
        .unwrap_err();
        assert_eq!(err, ExportsShapeError::MixedKeys);
    }

    #[test]
    fn test_invalid_key_rejected() {
        let err = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": {
                ".": "./index.js",
                ".hidden": "./hidden.js"
            }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ExportsShapeError::InvalidKey {
                key: ".hidden".to_string()
            }
        );
    }

    #[test]
    fn test_target_must_be_package_relative() {
        let err = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": { ".": "dist/index.js" }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ExportsShapeError::InvalidTarget {
                key: ".".to_string(),
                target: "dist/index.js".to_string()
            }
        );
    }

    #[test]
    fn test_array_exports_rejected() {
        let err = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": ["./a.js", "./b.js"]
        }))
        .unwrap_err();
        assert_eq!(err, ExportsShapeError::UnsupportedShape { found: "array" });
    }

    #[test]
    fn test_null_exports_counts_as_absent() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": null,
            "main": "./index.js"
        }))
        .unwrap();
        assert!(pkg.exports.is_none());
        assert_eq!(pkg.main.as_deref(), Some("./index.js"));
    }

    #[test]
    fn test_empty_exports_object_is_present_and_empty() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": {}
        }))
        .unwrap();
        let exports = pkg.exports.unwrap();
        assert!(exports.is_empty());
    }

    #[test]
    fn test_nested_condition_maps_parse() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": {
                ".": {
                    "node": { "import": "./node.mjs", "require": "./node.cjs" },
                    "default": "./index.js"
                }
            }
        }))
        .unwrap();

        let exports = pkg.exports.unwrap();
        match exports.get(".") {
            Some(ExportTarget::Conditions(conditions)) => {
                assert!(matches!(
                    conditions.get("node"),
                    Some(ExportTarget::Conditions(_))
                ));
            }
            other => panic!("expected conditions, got {other:?}"),
        }
    }

    #[test]
    fn test_subpath_key_nested_in_conditions_rejected() {
        let err = PackageDescriptor::from_json(&json!({
            "name": "test",
            "exports": {
                ".": { "./nested": "./a.js" }
            }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ExportsShapeError::InvalidConditionName {
                name: "./nested".to_string()
            }
        );
    }

    #[test]
    fn test_legacy_fields_string_only() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "test",
            "main": "./index.js",
            "module": "./index.mjs",
            "browser": { "./fs.js": false }
        }))
        .unwrap();
        assert_eq!(pkg.main.as_deref(), Some("./index.js"));
        assert_eq!(pkg.module.as_deref(), Some("./index.mjs"));
        // Object form of "browser" is a remapping table, not an entry point.
        assert!(pkg.browser.is_none());
    }

    #[test]
    fn test_missing_name_defaults_to_empty() {
        let pkg = PackageDescriptor::from_json(&json!({ "main": "./index.js" })).unwrap();
        assert_eq!(pkg.name, "");
    }

    #[test]
    fn test_read_descriptor_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("package.json");
        std::fs::write(
            &manifest_path,
            serde_json::to_string_pretty(&json!({
                "name": "disk-pkg",
                "exports": { ".": "./lib/main.js" }
            }))
            .unwrap(),
        )
        .unwrap();

        let pkg = read_descriptor(&manifest_path).unwrap();
        assert_eq!(pkg.name, "disk-pkg");
        assert!(pkg.exports.is_some());
    }

    #[test]
    fn test_read_descriptor_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_descriptor(&dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, Error::ManifestRead { .. }));
    }

    #[test]
    fn test_read_descriptor_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("package.json");
        std::fs::write(&manifest_path, "{ not json").unwrap();
        let err = read_descriptor(&manifest_path).unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }
}
