//! Step-by-step traces of entry-point resolution.
//!
//! Feeds the explain report: which branch was taken, which key and
//! condition matched, and why a resolution failed.

/// A single step in the resolution trace.
#[derive(Debug, Clone)]
pub struct TraceStep {
    /// Step name (e.g. "select_branch", "resolve_condition")
    pub step: &'static str,
    /// Whether this step succeeded
    pub ok: bool,
    /// Human-readable description of what happened
    pub detail: String,
    /// Exports key matched, if any
    pub key: Option<String>,
    /// Condition name used, if any
    pub condition: Option<String>,
    /// Target value selected, if any
    pub target: Option<String>,
}

impl TraceStep {
    /// Create a new trace step.
    pub fn new(step: &'static str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            step,
            ok,
            detail: detail.into(),
            key: None,
            condition: None,
            target: None,
        }
    }

    /// Set the matched key for this step.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the condition for this step.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Set the target for this step.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Warning generated during resolution.
#[derive(Debug, Clone)]
pub struct TraceWarning {
    /// Warning code (e.g. "legacy_resolution")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
}

impl TraceWarning {
    /// Create a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Complete resolution trace.
#[derive(Debug, Clone, Default)]
pub struct ResolveTrace {
    /// Ordered list of resolution steps
    pub steps: Vec<TraceStep>,
    /// Warnings generated during resolution
    pub warnings: Vec<TraceWarning>,
}

impl ResolveTrace {
    /// Create a new empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step to the trace.
    pub fn add_step(&mut self, step: TraceStep) {
        self.steps.push(step);
    }

    /// Add a warning to the trace.
    pub fn add_warning(&mut self, warning: TraceWarning) {
        self.warnings.push(warning);
    }

    /// Add a simple success step.
    pub fn success(&mut self, step: &'static str, detail: impl Into<String>) {
        self.steps.push(TraceStep::new(step, true, detail));
    }

    /// Add a simple failure step.
    pub fn failure(&mut self, step: &'static str, detail: impl Into<String>) {
        self.steps.push(TraceStep::new(step, false, detail));
    }
}

/// Step names used in resolution tracing.
pub mod steps {
    pub const SELECT_BRANCH: &str = "select_branch";
    pub const MATCH_EXPORTS_KEY: &str = "match_exports_key";
    pub const EXPAND_PATTERN: &str = "expand_pattern";
    pub const RESOLVE_CONDITION: &str = "resolve_condition";
    pub const RESOLVE_MAIN_FIELD: &str = "resolve_main_field";
    pub const FINAL_TARGET: &str = "final_target";
}

/// Warning codes used in resolution tracing.
pub mod warning_codes {
    pub const LEGACY_RESOLUTION: &str = "legacy_resolution";
    pub const DEFAULT_CONDITION: &str = "default_condition";
    pub const EMPTY_MAIN_FIELD: &str = "empty_main_field";
}
