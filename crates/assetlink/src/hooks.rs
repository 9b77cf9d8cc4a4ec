//! Types crossing the boundary between the plugin and the build driver.
//!
//! The driver invokes the plugin through three hooks: resolve (once per
//! import matching the plugin's filter), load (once per resolved module,
//! keyed by namespace), and end-of-build (once, after all outputs are
//! finalized). The structs here are the payloads of those hooks.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Routing namespace attached to a resolved import path.
///
/// The driver uses the namespace to pick which load handler processes a
/// module. A fresh import carries no namespace (`None` at the
/// [`ResolveArgs`] level); the plugin assigns one of these on first contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Synthetic module that hands back the asset as an in-memory buffer.
    Inline,
    /// Synthetic module that fetches the asset at runtime by URL.
    Stub,
    /// Terminal state: the asset's literal on-disk bytes.
    Asset,
}

impl Namespace {
    /// The string tag used by drivers with string-keyed namespaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "asset-inline",
            Self::Stub => "asset-stub",
            Self::Asset => "asset",
        }
    }

    /// Parse a driver-side namespace tag.
    ///
    /// Returns `None` for tags this plugin does not own, including the
    /// driver's default namespace for un-routed imports.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "asset-inline" => Some(Self::Inline),
            "asset-stub" => Some(Self::Stub),
            "asset" => Some(Self::Asset),
            _ => None,
        }
    }
}

/// Side-channel payload attached to a routing decision.
///
/// The synthetic modules are generated text with no directory context of
/// their own; this carries the original caller's resolution directory so the
/// re-import can still be located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginData {
    /// Absolute resolution directory of the original importer.
    pub resolve_dir: PathBuf,
}

/// A resolve-hook request from the driver.
#[derive(Debug, Clone)]
pub struct ResolveArgs {
    /// The import path as written in source.
    pub path: String,
    /// Namespace of the *importing* module, if this plugin assigned one.
    pub namespace: Option<Namespace>,
    /// Directory of the importing module, when it has one.
    pub resolve_dir: Option<PathBuf>,
    /// Plugin data carried over from a prior routing step.
    pub plugin_data: Option<PluginData>,
}

/// A routing decision returned to the driver.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The resolved module path.
    pub path: PathBuf,
    /// Namespace selecting the load handler for this module.
    pub namespace: Namespace,
    /// Plugin data to hand back on the subsequent load and re-resolve.
    pub plugin_data: Option<PluginData>,
}

/// A load-hook request from the driver.
#[derive(Debug, Clone)]
pub struct LoadArgs {
    /// The resolved module path.
    pub path: PathBuf,
    /// Namespace assigned by the resolve hook.
    pub namespace: Namespace,
    /// Plugin data attached by the resolve hook.
    pub plugin_data: Option<PluginData>,
}

/// Module contents produced by a load hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    /// Synthetic program source.
    Source(String),
    /// Raw asset bytes.
    Bytes(Vec<u8>),
}

/// How the driver should treat loaded contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    /// Compile the contents as ordinary module source.
    Source,
    /// Embed the bytes in the importing bundle as an in-memory buffer.
    Binary,
    /// Copy the bytes out as a standalone output file; the importing module
    /// receives the build-assigned output filename as a string.
    CopyFile,
}

/// A load-hook response.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// The module contents.
    pub contents: Contents,
    /// Loader kind for the contents.
    pub loader: Loader,
    /// Plugin data passed through unchanged.
    pub plugin_data: Option<PluginData>,
}

/// Immutable snapshot of a completed build's outputs.
///
/// Keyed by final output path. Deserializes from the driver's JSON metafile;
/// unknown per-output fields are ignored. The `BTreeMap` gives the
/// relocation pass a deterministic sweep order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputManifest {
    /// Metadata for each emitted output, keyed by its path.
    pub outputs: BTreeMap<String, OutputMeta>,
}

/// Per-output metadata from the driver's manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputMeta {
    /// Size of the output in bytes.
    #[serde(default)]
    pub bytes: u64,
    /// Entry point this output was produced from, if any.
    #[serde(default, rename = "entryPoint", skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
}

impl OutputManifest {
    /// Parse a manifest from the driver's JSON metafile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestParse`] if the text is not a valid manifest.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn namespace_tags_round_trip() {
        for ns in [Namespace::Inline, Namespace::Stub, Namespace::Asset] {
            assert_eq!(Namespace::from_tag(ns.as_str()), Some(ns));
        }
        assert_eq!(Namespace::from_tag("file"), None);
    }

    #[test]
    fn manifest_parses_driver_metafile_shape() {
        let json = r#"{
            "inputs": {"src/app.js": {"bytes": 120}},
            "outputs": {
                "dist/app.js": {
                    "bytes": 4096,
                    "entryPoint": "src/app.js",
                    "imports": []
                },
                "dist/weights-9f3a.bin": {"bytes": 65536}
            }
        }"#;

        let manifest = OutputManifest::from_json(json).unwrap();
        assert_eq!(manifest.outputs.len(), 2);
        assert_eq!(
            manifest.outputs["dist/app.js"].entry_point.as_deref(),
            Some("src/app.js")
        );
        assert_eq!(manifest.outputs["dist/weights-9f3a.bin"].bytes, 65536);
    }

    #[test]
    fn manifest_rejects_invalid_json() {
        assert!(OutputManifest::from_json("not json").is_err());
    }
}
