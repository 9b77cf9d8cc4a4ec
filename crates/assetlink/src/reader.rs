//! Terminal asset loading.
//!
//! The terminal namespace is where a binary-module path stops being routed
//! and its literal on-disk bytes are attached to the build: embedded into
//! the bundle under inline mode, or copied out as a standalone artifact
//! under deferred fetch. Reads are independent, path-keyed async I/O; the
//! driver may issue them concurrently and in any order.

use crate::config::DeliveryMode;
use crate::error::Error;
use crate::hooks::{Contents, LoadArgs, LoadResult, Loader};

/// Read the asset bytes and attach them per the configured mode.
///
/// A missing or unreadable asset fails the whole build: binary assets are
/// declared dependencies, so their absence is a misconfiguration rather than
/// a transient fault, and there is no retry.
pub(crate) async fn read_asset(args: &LoadArgs, mode: DeliveryMode) -> Result<LoadResult, Error> {
    let bytes = tokio::fs::read(&args.path)
        .await
        .map_err(|source| Error::AssetRead {
            path: args.path.clone(),
            source,
        })?;

    #[cfg(feature = "validate")]
    validate_wasm(&args.path, &bytes)?;

    tracing::debug!(
        path = %args.path.display(),
        len = bytes.len(),
        mode = ?mode,
        "read binary asset"
    );

    let loader = match mode {
        DeliveryMode::Inline => Loader::Binary,
        DeliveryMode::DeferredFetch => Loader::CopyFile,
    };

    Ok(LoadResult {
        contents: Contents::Bytes(bytes),
        loader,
        plugin_data: args.plugin_data.clone(),
    })
}

/// Validate `.wasm` assets before they reach the build.
///
/// Catches a corrupt module at build time instead of shipping a bundle that
/// fails at instantiation. Non-wasm extensions are passed through untouched.
#[cfg(feature = "validate")]
fn validate_wasm(path: &std::path::Path, bytes: &[u8]) -> Result<(), Error> {
    if path.extension().is_some_and(|ext| ext == "wasm") {
        wasmparser::validate(bytes).map_err(|e| Error::InvalidWasm {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}
