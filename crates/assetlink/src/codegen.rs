//! Synthetic module source for the two delivery strategies.
//!
//! Both generators emit a module that re-imports the original asset path
//! (the re-import is what the router sends to the terminal namespace) and
//! exports a single default factory returning a promise, so callers see the
//! same contract in either mode.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Textual marker standing in for an asset's final emitted URL.
///
/// `__ASSETLINK_URL__(ident)` is injected into deferred-fetch modules and
/// rewritten to a string literal by the post-build relocation pass, once the
/// build has assigned `ident` its real output filename.
pub const URL_MARKER: &str = "__ASSETLINK_URL__";

/// Deterministic binding identifier for an asset path.
///
/// Derived from a SHA-256 prefix of the resolved path, so the same path
/// yields the same identifier in every build and distinct paths yield
/// distinct identifiers, with no state shared between concurrent hook calls.
#[must_use]
pub fn asset_identifier(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_os_str().as_encoded_bytes());
    let digest = hasher.finalize();
    format!("__asset_{}", hex::encode(&digest[..6]))
}

/// Module source for an inline-mode import.
///
/// The asset bytes are embedded in the bundle by the terminal load, so the
/// factory wraps an already-available buffer; no placeholder is needed.
pub(crate) fn inline_module(path: &Path) -> String {
    let ident = asset_identifier(path);
    let import = js_string(path);
    format!(
        "import {ident} from {import};\n\
         export default function() {{\n\
         \x20   return Promise.resolve({ident}.buffer);\n\
         }};\n"
    )
}

/// Module source for a deferred-fetch import.
///
/// The terminal load copies the asset out as a standalone artifact, so the
/// import binding resolves to the build-assigned output filename. That name
/// is unknown while this source is generated; the marker carries the binding
/// until the relocation pass can substitute the real string.
pub(crate) fn deferred_fetch_module(path: &Path) -> String {
    let ident = asset_identifier(path);
    let import = js_string(path);
    format!(
        "import {ident} from {import};\n\
         export default function() {{\n\
         \x20   return fetch(new URL({URL_MARKER}({ident}), import.meta.url));\n\
         }};\n"
    )
}

/// Quote a path as a JavaScript string literal.
fn js_string(path: &Path) -> String {
    serde_json::Value::String(path.to_string_lossy().into_owned()).to_string()
}
