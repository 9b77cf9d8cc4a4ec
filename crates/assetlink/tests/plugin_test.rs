// Tests use expect/unwrap for simplicity
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! End-to-end plugin tests driving the hooks the way a build driver would:
//! resolve the import, load the synthetic module, resolve and load its
//! re-import, emit outputs to disk, then run the end-of-build pass.

use std::fs;
use std::path::Path;

use assetlink::{
    AssetPlugin, Contents, DeliveryMode, LoadArgs, LoadResult, Loader, Namespace, OutputManifest,
    OutputMeta, ResolveArgs, asset_identifier,
};

/// Walk one import through resolve → load → re-resolve → terminal load,
/// returning the synthetic module source and the terminal load result.
async fn drive_import(plugin: &AssetPlugin, import: &str, resolve_dir: &Path) -> (String, LoadResult) {
    let resolution = plugin
        .on_resolve(&ResolveArgs {
            path: import.to_string(),
            namespace: None,
            resolve_dir: Some(resolve_dir.to_path_buf()),
            plugin_data: None,
        })
        .expect("import should match the plugin filter");

    let synthetic = plugin
        .on_load(&LoadArgs {
            path: resolution.path.clone(),
            namespace: resolution.namespace,
            plugin_data: resolution.plugin_data.clone(),
        })
        .await
        .unwrap();
    assert_eq!(synthetic.loader, Loader::Source);
    let source = match &synthetic.contents {
        Contents::Source(source) => source.clone(),
        Contents::Bytes(_) => panic!("synthetic load should produce source"),
    };

    // The synthetic module re-imports the same path under its own namespace.
    let reimport = plugin
        .on_resolve(&ResolveArgs {
            path: resolution.path.to_string_lossy().into_owned(),
            namespace: Some(resolution.namespace),
            resolve_dir: None,
            plugin_data: synthetic.plugin_data.clone(),
        })
        .unwrap();
    assert_eq!(reimport.namespace, Namespace::Asset);
    assert_eq!(reimport.path, resolution.path);
    assert!(reimport.plugin_data.is_none());

    let terminal = plugin
        .on_load(&LoadArgs {
            path: reimport.path,
            namespace: reimport.namespace,
            plugin_data: None,
        })
        .await
        .unwrap();

    (source, terminal)
}

fn manifest_of<P: AsRef<Path>>(paths: &[P]) -> OutputManifest {
    let mut manifest = OutputManifest::default();
    for path in paths {
        let path = path.as_ref();
        let bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        manifest.outputs.insert(
            path.to_string_lossy().into_owned(),
            OutputMeta {
                bytes,
                entry_point: None,
            },
        );
    }
    manifest
}

#[tokio::test]
async fn inline_mode_round_trips_asset_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let payload: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    fs::write(dir.path().join("weights.bin"), &payload).unwrap();

    let plugin = AssetPlugin::builder()
        .mode(DeliveryMode::Inline)
        .extension("bin")
        .build()
        .unwrap();

    let (source, terminal) = drive_import(&plugin, "weights.bin", dir.path()).await;

    // Inline source wraps the embedded buffer; no placeholder involved.
    assert!(source.contains("Promise.resolve"));
    assert!(!source.contains(assetlink::URL_MARKER));

    assert_eq!(terminal.loader, Loader::Binary);
    assert_eq!(terminal.contents, Contents::Bytes(payload));
}

#[tokio::test]
async fn deferred_fetch_build_relinks_the_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dist = dir.path().join("dist");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dist).unwrap();
    fs::write(src.join("weights.bin"), b"model bytes").unwrap();

    let plugin = AssetPlugin::builder()
        .mode(DeliveryMode::DeferredFetch)
        .extension("bin")
        .build()
        .unwrap();

    let (source, terminal) = drive_import(&plugin, "weights.bin", &src).await;

    // Exactly one placeholder, referencing the asset's binding.
    let ident = asset_identifier(&src.join("weights.bin"));
    assert_eq!(source.matches(assetlink::URL_MARKER).count(), 1);
    assert!(source.contains(&ident));
    assert_eq!(terminal.loader, Loader::CopyFile);

    // Simulate the driver: the copy-file artifact gets a hashed name, and
    // the bundle inlines the filename binding next to the consuming code.
    let asset_out = dist.join("weights-9f3a.bin");
    match &terminal.contents {
        Contents::Bytes(bytes) => fs::write(&asset_out, bytes).unwrap(),
        Contents::Source(_) => panic!("terminal load should produce bytes"),
    }
    let body = source
        .split_once(";\n")
        .expect("generated source starts with an import statement")
        .1;
    let bundle = format!("var {ident} = \"weights-9f3a.bin\";\n{body}");
    let bundle_out = dist.join("app.js");
    fs::write(&bundle_out, &bundle).unwrap();

    let manifest = manifest_of(&[&bundle_out, &asset_out]);
    let report = plugin.on_end(&manifest).unwrap();

    assert_eq!(report.patched, vec![bundle_out.to_string_lossy().into_owned()]);
    assert!(report.unresolved.is_empty());

    let relinked = fs::read_to_string(&bundle_out).unwrap();
    assert!(relinked.contains("fetch(new URL(\"weights-9f3a.bin\", import.meta.url))"));
    assert!(!relinked.contains(assetlink::URL_MARKER));

    // The binary artifact is never scanned or touched.
    assert_eq!(fs::read(&asset_out).unwrap(), b"model bytes");
}

#[tokio::test]
async fn relocation_pass_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("app.js");
    fs::write(
        &out,
        "var bound = \"weights-9f3a.bin\";\nfetch(new URL(__ASSETLINK_URL__(bound), import.meta.url));\n",
    )
    .unwrap();

    let plugin = AssetPlugin::new(DeliveryMode::DeferredFetch);
    let manifest = manifest_of(&[&out]);

    let first = plugin.on_end(&manifest).unwrap();
    assert_eq!(first.patched.len(), 1);
    let after_first = fs::read(&out).unwrap();

    let second = plugin.on_end(&manifest).unwrap();
    assert!(second.patched.is_empty());
    assert_eq!(fs::read(&out).unwrap(), after_first);
}

#[tokio::test]
async fn relocation_miss_leaves_artifact_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("app.js");
    let text = "fetch(new URL(__ASSETLINK_URL__(bar), import.meta.url));\n";
    fs::write(&out, text).unwrap();

    let plugin = AssetPlugin::new(DeliveryMode::DeferredFetch);
    let report = plugin.on_end(&manifest_of(&[&out])).unwrap();

    assert!(report.patched.is_empty());
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].identifier, "bar");
    assert_eq!(fs::read_to_string(&out).unwrap(), text);
}

#[tokio::test]
async fn missing_asset_fails_the_build_with_the_offending_path() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = AssetPlugin::builder()
        .mode(DeliveryMode::Inline)
        .extension("bin")
        .build()
        .unwrap();

    let resolution = plugin
        .on_resolve(&ResolveArgs {
            path: "missing.bin".to_string(),
            namespace: None,
            resolve_dir: Some(dir.path().to_path_buf()),
            plugin_data: None,
        })
        .unwrap();

    // Terminal load of the re-import is where the read happens.
    let err = plugin
        .on_load(&LoadArgs {
            path: resolution.path.clone(),
            namespace: Namespace::Asset,
            plugin_data: None,
        })
        .await
        .unwrap_err();

    match err {
        assetlink::Error::AssetRead { path, .. } => {
            assert_eq!(path, dir.path().join("missing.bin"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
