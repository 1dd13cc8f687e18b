//! Entry-point resolution for package imports.
//!
//! Implements the decision a bundler makes once per import specifier:
//! pick one concrete file target from a package's exports map or legacy
//! main fields, driven by the active platform/format preference orders.
//! Pure over already-parsed metadata; no filesystem probing.

mod error;
mod exports;
mod fields;
mod request;
mod resolve;
pub mod trace;

pub use error::{codes, ResolveError};
pub use request::ImportRequest;
pub use resolve::{resolve, resolve_with_trace, Mechanism, Resolution, TracedResolution};
pub use trace::{
    steps as trace_steps, warning_codes as trace_warning_codes, ResolveTrace, TraceStep,
    TraceWarning,
};
