use std::path::PathBuf;
use thiserror::Error;

use crate::manifest::ExportsShapeError;

/// Core error type for resolvent operations.
///
/// Covers the loader edge of the crate: reading and parsing package
/// manifests. Resolution outcomes have their own taxonomy in
/// [`crate::resolver::ResolveError`]; a malformed manifest is a loader
/// failure, not a resolution result.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid exports in manifest at {path}: {source}")]
    ManifestExports {
        path: PathBuf,
        #[source]
        source: ExportsShapeError,
    },
}
