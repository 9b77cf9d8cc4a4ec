//! Plugin configuration.

use regex::Regex;

use crate::error::Error;
use crate::plugin::AssetPlugin;

/// Delivery strategy for binary assets, fixed for the whole build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Embed asset bytes directly into the emitted bundle; the generated
    /// factory resolves synchronously-available data.
    Inline,
    /// Emit the asset as a standalone output artifact and fetch it at
    /// runtime by URL, finished by the post-build relocation pass.
    DeferredFetch,
}

/// File extensions treated as binary-module imports when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["wasm"];

/// Builder for [`AssetPlugin`].
///
/// ```rust
/// use assetlink::{AssetPlugin, DeliveryMode};
///
/// let plugin = AssetPlugin::builder()
///     .mode(DeliveryMode::DeferredFetch)
///     .extension("bin")
///     .build()?;
/// # Ok::<(), assetlink::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AssetPluginBuilder {
    mode: DeliveryMode,
    extensions: Vec<String>,
}

impl Default for AssetPluginBuilder {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::DeferredFetch,
            extensions: Vec::new(),
        }
    }
}

impl AssetPluginBuilder {
    /// Create a builder with default settings (deferred fetch, `.wasm` only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delivery strategy.
    #[must_use]
    pub const fn mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a file extension (without the dot) to treat as a binary-module
    /// import. Replaces the default `wasm`-only set on first use.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Build the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Filter`] if the import-path filter cannot be
    /// compiled from the configured extensions.
    pub fn build(self) -> Result<AssetPlugin, Error> {
        let filter = compile_filter(&self.extensions)?;
        Ok(AssetPlugin::from_parts(self.mode, filter))
    }
}

/// Compile the import-path filter for a set of extensions.
///
/// Falls back to [`DEFAULT_EXTENSIONS`] when the set is empty.
pub(crate) fn compile_filter(extensions: &[String]) -> Result<Regex, Error> {
    let alternation = if extensions.is_empty() {
        DEFAULT_EXTENSIONS.join("|")
    } else {
        extensions
            .iter()
            .map(|ext| regex::escape(ext))
            .collect::<Vec<_>>()
            .join("|")
    };
    Ok(Regex::new(&format!(r"\.(?:{alternation})$"))?)
}
