//! The plugin surface the build driver drives.

use std::sync::LazyLock;

use regex::Regex;

use crate::codegen;
use crate::config::{AssetPluginBuilder, DeliveryMode, compile_filter};
use crate::error::Error;
use crate::hooks::{
    Contents, LoadArgs, LoadResult, Loader, Namespace, OutputManifest, ResolveArgs, Resolution,
};
use crate::reader;
use crate::relink::{self, RelinkReport};
use crate::router;

#[allow(clippy::expect_used)]
static DEFAULT_FILTER: LazyLock<Regex> =
    LazyLock::new(|| compile_filter(&[]).expect("default filter is valid"));

/// Bundler plugin resolving and transforming binary-module imports.
///
/// All hook methods take `&self` and share no mutable state: the driver may
/// invoke them concurrently across the module graph. The delivery mode is
/// fixed at construction for the whole build.
///
/// # Example
///
/// ```rust
/// use assetlink::{AssetPlugin, DeliveryMode, Namespace, ResolveArgs};
///
/// let plugin = AssetPlugin::new(DeliveryMode::Inline);
/// let resolution = plugin
///     .on_resolve(&ResolveArgs {
///         path: "engine.wasm".to_string(),
///         namespace: None,
///         resolve_dir: Some("/proj/src".into()),
///         plugin_data: None,
///     })
///     .unwrap();
/// assert_eq!(resolution.namespace, Namespace::Inline);
/// ```
#[derive(Debug, Clone)]
pub struct AssetPlugin {
    mode: DeliveryMode,
    filter: Regex,
}

impl AssetPlugin {
    /// Create a plugin with the default `.wasm` import filter.
    #[must_use]
    pub fn new(mode: DeliveryMode) -> Self {
        Self {
            mode,
            filter: DEFAULT_FILTER.clone(),
        }
    }

    /// Create a plugin builder.
    #[must_use]
    pub fn builder() -> AssetPluginBuilder {
        AssetPluginBuilder::new()
    }

    pub(crate) fn from_parts(mode: DeliveryMode, filter: Regex) -> Self {
        Self { mode, filter }
    }

    /// The configured delivery mode.
    #[must_use]
    pub const fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// The import-path pattern the driver should register the resolve hook
    /// under.
    #[must_use]
    pub fn resolve_filter(&self) -> &Regex {
        &self.filter
    }

    /// Resolve hook: classify a binary-module import.
    ///
    /// Returns `None` for un-routed paths outside the configured filter, so
    /// the driver falls through to its default resolver. Everything else is
    /// pure routing; see [`Namespace`] for the states.
    #[must_use]
    pub fn on_resolve(&self, args: &ResolveArgs) -> Option<Resolution> {
        if args.namespace.is_none() && !self.filter.is_match(&args.path) {
            return None;
        }
        let resolution = router::route(args, self.mode);
        tracing::debug!(
            path = %args.path,
            from = ?args.namespace,
            to = ?resolution.namespace,
            "routed binary-module import"
        );
        Some(resolution)
    }

    /// Load hook: produce module contents for a routed path.
    ///
    /// Synthetic namespaces emit generated source; the terminal namespace
    /// reads the asset bytes from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetRead`] when a terminal load cannot read the
    /// asset (fatal for the build).
    pub async fn on_load(&self, args: &LoadArgs) -> Result<LoadResult, Error> {
        match args.namespace {
            Namespace::Inline => Ok(LoadResult {
                contents: Contents::Source(codegen::inline_module(&args.path)),
                loader: Loader::Source,
                plugin_data: args.plugin_data.clone(),
            }),
            Namespace::Stub => Ok(LoadResult {
                contents: Contents::Source(codegen::deferred_fetch_module(&args.path)),
                loader: Loader::Source,
                plugin_data: args.plugin_data.clone(),
            }),
            Namespace::Asset => reader::read_asset(args, self.mode).await,
        }
    }

    /// End-of-build hook: run the placeholder relocation pass.
    ///
    /// Must be called exactly once, after the driver has finalized every
    /// output in `manifest`.
    ///
    /// # Errors
    ///
    /// Returns an error if an output artifact cannot be read or rewritten.
    pub fn on_end(&self, manifest: &OutputManifest) -> Result<RelinkReport, Error> {
        relink::relink_outputs(manifest)
    }
}
