//! Namespace routing for binary-module imports.
//!
//! Every import the driver hands us is classified into one of three states:
//! a first contact becomes a synthetic module (inline or stub, by configured
//! mode), and the synthetic module's own re-import of the same path becomes
//! a terminal asset load. Routing is a pure function of the request and the
//! configuration; the recursion guard is the namespace itself - a request
//! already carrying an inline or stub namespace never re-enters them.

use std::path::{Path, PathBuf};

use crate::config::DeliveryMode;
use crate::hooks::{Namespace, PluginData, ResolveArgs, Resolution};

/// Classify one resolve request.
pub(crate) fn route(args: &ResolveArgs, mode: DeliveryMode) -> Resolution {
    match args.namespace {
        // The synthetic module's self re-import: go straight to the terminal
        // asset namespace with the same literal path. No new plugin data;
        // re-attaching it here is what would make resolution recurse forever.
        Some(Namespace::Inline | Namespace::Stub) => Resolution {
            path: recover_path(&args.path, args.plugin_data.as_ref()),
            namespace: Namespace::Asset,
            plugin_data: None,
        },
        // First contact (or a namespace we did not assign): rewrite to an
        // absolute location when the caller has a directory, pick the
        // synthetic namespace for the configured mode, and capture the
        // caller's resolution context for the re-import.
        Some(Namespace::Asset) | None => {
            let path = absolutize(&args.path, args.resolve_dir.as_deref());
            let namespace = match mode {
                DeliveryMode::Inline => Namespace::Inline,
                DeliveryMode::DeferredFetch => Namespace::Stub,
            };
            Resolution {
                path,
                namespace,
                plugin_data: args
                    .resolve_dir
                    .clone()
                    .map(|resolve_dir| PluginData { resolve_dir }),
            }
        }
    }
}

/// Join a relative import against the caller's directory, if known.
fn absolutize(path: &str, resolve_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(path);
    match resolve_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Recover the on-disk path for a synthetic module's re-import.
///
/// The path is normally already absolute (the first routing step absolutized
/// it), but a caller without a resolve dir leaves it relative; the plugin
/// data captured on first contact fills the gap.
fn recover_path(path: &str, plugin_data: Option<&PluginData>) -> PathBuf {
    let path = Path::new(path);
    match plugin_data {
        Some(data) if path.is_relative() => data.resolve_dir.join(path),
        _ => path.to_path_buf(),
    }
}
