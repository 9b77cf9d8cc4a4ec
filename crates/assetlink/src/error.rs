//! Error types for the plugin.

use std::io;
use std::path::PathBuf;

/// Errors surfaced to the invoking build driver.
///
/// Every variant is fatal for the build. Relocation misses are deliberately
/// *not* errors (see [`crate::RelinkReport`]): the build completes and the
/// unresolved marker is reported instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A binary asset named by an import could not be read.
    ///
    /// Binary assets are declared dependencies; their absence is a build
    /// misconfiguration, not a transient fault, so there is no retry.
    #[error("failed to read asset {path}: {source}")]
    AssetRead {
        /// The resolved on-disk path of the asset.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An asset with a `.wasm` extension failed module validation.
    #[cfg(feature = "validate")]
    #[error("invalid wasm module {path}: {message}")]
    InvalidWasm {
        /// The resolved on-disk path of the asset.
        path: PathBuf,
        /// The validator's diagnostic.
        message: String,
    },

    /// An output artifact listed in the manifest could not be read back.
    #[error("failed to read output {path}: {source}")]
    OutputRead {
        /// The output path as recorded in the manifest.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A rewritten output artifact could not be persisted.
    #[error("failed to rewrite output {path}: {source}")]
    OutputWrite {
        /// The output path as recorded in the manifest.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The driver's output manifest was not valid JSON.
    #[error("malformed output manifest: {0}")]
    ManifestParse(#[from] serde_json::Error),

    /// The configured import-path filter could not be compiled.
    #[error("invalid asset filter: {0}")]
    Filter(#[from] regex::Error),
}
