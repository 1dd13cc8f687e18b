use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Target platform for a build.
///
/// Decides which legacy main fields and which exports conditions apply
/// when the caller does not override them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Node,
    #[default]
    Browser,
    Neutral,
}

impl Platform {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Browser => "browser",
            Self::Neutral => "neutral",
        }
    }

    /// All platforms, in table order.
    pub const ALL: &'static [Platform] = &[Platform::Browser, Platform::Node, Platform::Neutral];
}

impl FromStr for Platform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "browser" => Ok(Self::Browser),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseError::new("platform", s, "node, browser, neutral")),
        }
    }
}

/// Output module format for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Esm,
    Cjs,
}

impl OutputFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Esm => "esm",
            Self::Cjs => "cjs",
        }
    }

    /// All formats, in table order.
    pub const ALL: &'static [OutputFormat] = &[OutputFormat::Esm, OutputFormat::Cjs];
}

impl FromStr for OutputFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "esm" => Ok(Self::Esm),
            "cjs" => Ok(Self::Cjs),
            _ => Err(ParseError::new("format", s, "esm, cjs")),
        }
    }
}

/// A legacy entry-point field on a package manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainField {
    Browser,
    Module,
    Main,
}

impl MainField {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Module => "module",
            Self::Main => "main",
        }
    }
}

impl FromStr for MainField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "browser" => Ok(Self::Browser),
            "module" => Ok(Self::Module),
            "main" => Ok(Self::Main),
            _ => Err(ParseError::new("main field", s, "browser, module, main")),
        }
    }
}

/// Error for an unrecognized platform/format/field name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what} {value:?} (expected one of: {expected})")]
pub struct ParseError {
    what: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseError {
    fn new(what: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            what,
            value: value.to_string(),
            expected,
        }
    }
}

/// The resolver's environment input for one resolution call.
///
/// `main_fields` and `conditions`, when set, fully replace the orders
/// derived from `platform` and `format`. They are total overrides, not
/// merged with the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub platform: Platform,

    pub format: OutputFormat,

    /// Explicit main-field preference order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_fields: Option<Vec<MainField>>,

    /// Explicit condition preference order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
}

impl BuildConfig {
    /// Create a config with derived preference orders.
    #[must_use]
    pub fn new(platform: Platform, format: OutputFormat) -> Self {
        Self {
            platform,
            format,
            main_fields: None,
            conditions: None,
        }
    }

    /// Set an explicit main-field order.
    #[must_use]
    pub fn with_main_fields(mut self, fields: Vec<MainField>) -> Self {
        self.main_fields = Some(fields);
        self
    }

    /// Set an explicit condition order.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Vec<String>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// The effective main-field order: the explicit override if set,
    /// otherwise the platform-derived default.
    #[must_use]
    pub fn main_field_order(&self) -> &[MainField] {
        match &self.main_fields {
            Some(fields) => fields,
            None => defaults::main_field_order(self.platform),
        }
    }

    /// The effective condition order: the explicit override if set,
    /// otherwise the default derived from platform and format.
    #[must_use]
    pub fn condition_order(&self) -> Vec<&str> {
        match &self.conditions {
            Some(conditions) => conditions.iter().map(String::as_str).collect(),
            None => defaults::condition_order(self.platform, self.format).to_vec(),
        }
    }
}

/// Derived preference orders, as pure const data.
///
/// These tables are the single source of the platform/format derivation
/// rules. `BuildConfig` consults them through its accessors; nothing in
/// the crate mutates them.
pub mod defaults {
    use super::{MainField, OutputFormat, Platform};

    pub const BROWSER_MAIN_FIELDS: &[MainField] =
        &[MainField::Browser, MainField::Module, MainField::Main];
    pub const NODE_MAIN_FIELDS: &[MainField] = &[MainField::Main, MainField::Module];
    pub const NEUTRAL_MAIN_FIELDS: &[MainField] = &[MainField::Module, MainField::Main];

    pub const BROWSER_ESM_CONDITIONS: &[&str] = &["browser", "import", "default"];
    pub const BROWSER_CJS_CONDITIONS: &[&str] = &["browser", "require", "default"];
    pub const NODE_ESM_CONDITIONS: &[&str] = &["node", "import", "default"];
    pub const NODE_CJS_CONDITIONS: &[&str] = &["node", "require", "default"];
    pub const NEUTRAL_ESM_CONDITIONS: &[&str] = &["import", "default"];
    pub const NEUTRAL_CJS_CONDITIONS: &[&str] = &["require", "default"];

    /// Main-field order derived from the platform.
    #[must_use]
    pub fn main_field_order(platform: Platform) -> &'static [MainField] {
        match platform {
            Platform::Browser => BROWSER_MAIN_FIELDS,
            Platform::Node => NODE_MAIN_FIELDS,
            Platform::Neutral => NEUTRAL_MAIN_FIELDS,
        }
    }

    /// Condition order derived from platform and output format.
    #[must_use]
    pub fn condition_order(platform: Platform, format: OutputFormat) -> &'static [&'static str] {
        match (platform, format) {
            (Platform::Browser, OutputFormat::Esm) => BROWSER_ESM_CONDITIONS,
            (Platform::Browser, OutputFormat::Cjs) => BROWSER_CJS_CONDITIONS,
            (Platform::Node, OutputFormat::Esm) => NODE_ESM_CONDITIONS,
            (Platform::Node, OutputFormat::Cjs) => NODE_CJS_CONDITIONS,
            (Platform::Neutral, OutputFormat::Esm) => NEUTRAL_ESM_CONDITIONS,
            (Platform::Neutral, OutputFormat::Cjs) => NEUTRAL_CJS_CONDITIONS,
        }
    }
}
