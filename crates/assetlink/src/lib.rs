//! # Assetlink
//!
//! A bundler-plugin core that resolves and transforms binary asset imports
//! ("binary-module" imports) into one of two delivery strategies, chosen at
//! build configuration time:
//!
//! - **Inline** - embed the binary directly into the emitted bundle as an
//!   in-memory buffer.
//! - **Deferred fetch** - emit the binary as a separate output artifact and
//!   have the bundle fetch it at runtime by URL.
//!
//! The deferred path cannot know the final content-addressed filename the
//! driver will assign to the copied-out artifact while bundling is still in
//! flight, so the generated code carries a textual placeholder
//! (`__ASSETLINK_URL__(ident)`) that a post-build relocation pass rewrites
//! to the real filename once all outputs are fixed - a link-time relocation
//! over emitted text.
//!
//! ## Hook contract
//!
//! The surrounding build driver owns the module graph; this crate plugs into
//! it through three hooks on [`AssetPlugin`]:
//!
//! - [`AssetPlugin::on_resolve`] - classify each matching import into a
//!   routing [`Namespace`].
//! - [`AssetPlugin::on_load`] - emit synthetic module source for the
//!   inline/stub namespaces, or the asset's literal bytes for the terminal
//!   one.
//! - [`AssetPlugin::on_end`] - run the relocation pass over the driver's
//!   final [`OutputManifest`] snapshot.
//!
//! Hook methods are stateless and safe under the driver's concurrent,
//! out-of-order invocation.
//!
//! ## Quick start
//!
//! ```rust
//! use assetlink::{AssetPlugin, DeliveryMode};
//!
//! let plugin = AssetPlugin::builder()
//!     .mode(DeliveryMode::Inline)
//!     .extension("bin")
//!     .build()?;
//! # Ok::<(), assetlink::Error>(())
//! ```

#![forbid(unsafe_code)]

mod codegen;
mod config;
mod error;
mod hooks;
mod plugin;
mod reader;
mod relink;
mod router;

pub use codegen::{URL_MARKER, asset_identifier};
pub use config::{AssetPluginBuilder, DEFAULT_EXTENSIONS, DeliveryMode};
pub use error::Error;
pub use hooks::{
    Contents, LoadArgs, LoadResult, Loader, Namespace, OutputManifest, OutputMeta, PluginData,
    ResolveArgs, Resolution,
};
pub use plugin::AssetPlugin;
pub use relink::{RelinkReport, UnresolvedMarker, relink_outputs};
