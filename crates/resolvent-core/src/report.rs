//! Schema-versioned reports for machine-readable output.
//!
//! Output structs are separate from the core resolution types so the
//! wire shape can stay stable while internals move.

use serde::Serialize;

use crate::config::{defaults, BuildConfig, MainField, OutputFormat, Platform};
use crate::resolver::{
    ImportRequest, Mechanism, TraceStep, TraceWarning, TracedResolution,
};

/// Schema version for the explain output format.
/// Bump when the report structure changes incompatibly.
pub const EXPLAIN_SCHEMA_VERSION: u32 = 1;

/// Schema version for the defaults output format.
pub const DEFAULTS_SCHEMA_VERSION: u32 = 1;

/// One resolution, explained: the request, the effective preference
/// orders, the outcome, and the full trace.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    pub schema_version: u32,
    pub package: String,
    pub specifier: String,
    pub subpath: String,
    pub platform: Platform,
    pub format: OutputFormat,
    /// Effective condition order (override or derived).
    pub conditions: Vec<String>,
    /// Effective main-field order (override or derived).
    pub main_fields: Vec<MainField>,
    /// `"resolved"` or `"unresolved"`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<Mechanism>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<MainField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub trace: Vec<TraceStepOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarningOutput>,
}

impl ExplainReport {
    /// Build a report from a traced resolution.
    #[must_use]
    pub fn new(
        package: &str,
        request: &ImportRequest,
        config: &BuildConfig,
        traced: &TracedResolution,
    ) -> Self {
        let mut report = Self {
            schema_version: EXPLAIN_SCHEMA_VERSION,
            package: package.to_string(),
            specifier: request.specifier.clone(),
            subpath: request.subpath.clone(),
            platform: config.platform,
            format: config.format,
            conditions: config
                .condition_order()
                .iter()
                .map(ToString::to_string)
                .collect(),
            main_fields: config.main_field_order().to_vec(),
            status: "unresolved",
            resolved: None,
            mechanism: None,
            field: None,
            condition: None,
            error_code: None,
            error_message: None,
            trace: traced.trace.steps.iter().map(TraceStepOutput::from).collect(),
            warnings: traced
                .trace
                .warnings
                .iter()
                .map(TraceWarningOutput::from)
                .collect(),
        };

        match &traced.outcome {
            Ok(resolution) => {
                report.status = "resolved";
                report.resolved = Some(resolution.target.clone());
                report.mechanism = Some(resolution.mechanism);
                report.field = resolution.mechanism.field();
                report.condition = resolution.condition.clone();
            }
            Err(err) => {
                report.error_code = Some(err.code());
                report.error_message = Some(err.to_string());
            }
        }

        report
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.status == "resolved"
    }
}

/// A trace step in output form.
#[derive(Debug, Clone, Serialize)]
pub struct TraceStepOutput {
    pub step: &'static str,
    pub ok: bool,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl From<&TraceStep> for TraceStepOutput {
    fn from(step: &TraceStep) -> Self {
        Self {
            step: step.step,
            ok: step.ok,
            detail: step.detail.clone(),
            key: step.key.clone(),
            condition: step.condition.clone(),
            target: step.target.clone(),
        }
    }
}

/// A trace warning in output form.
#[derive(Debug, Clone, Serialize)]
pub struct TraceWarningOutput {
    pub code: String,
    pub message: String,
}

impl From<&TraceWarning> for TraceWarningOutput {
    fn from(warning: &TraceWarning) -> Self {
        Self {
            code: warning.code.clone(),
            message: warning.message.clone(),
        }
    }
}

/// The derived preference tables, reported.
#[derive(Debug, Clone, Serialize)]
pub struct DefaultsReport {
    pub schema_version: u32,
    pub rows: Vec<DefaultsRow>,
}

/// One platform/format row of the derivation tables.
#[derive(Debug, Clone, Serialize)]
pub struct DefaultsRow {
    pub platform: Platform,
    pub format: OutputFormat,
    pub main_fields: Vec<MainField>,
    pub conditions: Vec<String>,
}

impl DefaultsRow {
    #[must_use]
    pub fn new(platform: Platform, format: OutputFormat) -> Self {
        Self {
            platform,
            format,
            main_fields: defaults::main_field_order(platform).to_vec(),
            conditions: defaults::condition_order(platform, format)
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl DefaultsReport {
    /// All platform/format rows, in table order.
    #[must_use]
    pub fn all() -> Self {
        let mut rows = Vec::new();
        for platform in Platform::ALL {
            for format in OutputFormat::ALL {
                rows.push(DefaultsRow::new(*platform, *format));
            }
        }
        Self {
            schema_version: DEFAULTS_SCHEMA_VERSION,
            rows,
        }
    }

    /// A single platform/format row.
    #[must_use]
    pub fn for_target(platform: Platform, format: OutputFormat) -> Self {
        Self {
            schema_version: DEFAULTS_SCHEMA_VERSION,
            rows: vec![DefaultsRow::new(platform, format)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::PackageDescriptor;
    use crate::resolver::resolve_with_trace;
    use serde_json::json;

    #[test]
    fn test_explain_report_resolved() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "ui-kit",
            "exports": { ".": { "import": "./esm.js", "require": "./cjs.cjs" } }
        }))
        .unwrap();
        let config = BuildConfig::new(Platform::Node, OutputFormat::Cjs);
        let request = ImportRequest::root("ui-kit");
        let traced = resolve_with_trace(&pkg, &request, &config);

        let report = ExplainReport::new(&pkg.name, &request, &config, &traced);
        assert!(report.is_resolved());
        assert_eq!(report.resolved.as_deref(), Some("./cjs.cjs"));
        assert_eq!(report.condition.as_deref(), Some("require"));
        assert_eq!(report.conditions, vec!["node", "require", "default"]);
        assert!(report.error_code.is_none());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["schema_version"], EXPLAIN_SCHEMA_VERSION);
        assert_eq!(value["platform"], "node");
        assert_eq!(value["format"], "cjs");
        assert_eq!(value["mechanism"], "exports");
        // Absent optionals are omitted, not null.
        assert!(value.get("error_code").is_none());
    }

    #[test]
    fn test_explain_report_unresolved() {
        let pkg = PackageDescriptor::from_json(&json!({
            "name": "ui-kit",
            "exports": { ".": "./index.js" }
        }))
        .unwrap();
        let config = BuildConfig::default();
        let request = ImportRequest::new("ui-kit", "./card");
        let traced = resolve_with_trace(&pkg, &request, &config);

        let report = ExplainReport::new(&pkg.name, &request, &config, &traced);
        assert!(!report.is_resolved());
        assert_eq!(report.error_code, Some("SUBPATH_NOT_EXPORTED"));
        assert!(report.resolved.is_none());
        assert!(!report.trace.is_empty());
    }

    #[test]
    fn test_defaults_report_all_rows() {
        let report = DefaultsReport::all();
        assert_eq!(report.rows.len(), 6);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["schema_version"], DEFAULTS_SCHEMA_VERSION);
        assert_eq!(value["rows"][0]["platform"], "browser");
        assert_eq!(value["rows"][0]["format"], "esm");
        assert_eq!(
            value["rows"][0]["main_fields"],
            json!(["browser", "module", "main"])
        );
    }

    #[test]
    fn test_defaults_report_single_row() {
        let report = DefaultsReport::for_target(Platform::Neutral, OutputFormat::Cjs);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].conditions, vec!["require", "default"]);
        assert_eq!(
            report.rows[0].main_fields,
            vec![MainField::Module, MainField::Main]
        );
    }
}
