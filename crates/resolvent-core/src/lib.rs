#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod report;
pub mod resolver;
pub mod version;

pub use config::{BuildConfig, MainField, OutputFormat, Platform};
pub use error::Error;
pub use manifest::{
    read_descriptor, ConditionMap, ExportTarget, ExportsMap, ExportsShapeError, PackageDescriptor,
};
pub use report::{
    DefaultsReport, DefaultsRow, ExplainReport, DEFAULTS_SCHEMA_VERSION, EXPLAIN_SCHEMA_VERSION,
};
pub use resolver::{
    codes as resolve_codes, resolve, resolve_with_trace, ImportRequest, Mechanism, ResolveError,
    ResolveTrace, Resolution, TracedResolution,
};
pub use version::VERSION;
