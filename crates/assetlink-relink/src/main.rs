//! CLI for running assetlink's post-build relocation pass standalone.
//!
//! Useful when the build driver cannot host the end-of-build hook itself
//! (e.g. the bundle step and the asset step run in separate processes).
//!
//! # Examples
//!
//! ```bash
//! # Relink from the driver's JSON metafile
//! assetlink-relink --metafile dist/meta.json
//!
//! # No metafile: discover text outputs by walking the output directory
//! assetlink-relink dist/
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use assetlink::{OutputManifest, OutputMeta, relink_outputs};
use clap::Parser;
use walkdir::WalkDir;

/// Rewrite assetlink URL placeholders in emitted bundler outputs.
#[derive(Parser, Debug)]
#[command(name = "assetlink-relink")]
#[command(version, about, long_about = None)]
struct Args {
    /// Output directory to scan for text outputs (ignored with --metafile)
    outdir: Option<PathBuf>,

    /// Path to the driver's JSON metafile describing the output set
    #[arg(short, long)]
    metafile: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let started = Instant::now();

    let manifest = match (&args.metafile, &args.outdir) {
        (Some(metafile), _) => {
            let text = fs::read_to_string(metafile)
                .with_context(|| format!("reading metafile {}", metafile.display()))?;
            OutputManifest::from_json(&text)
                .with_context(|| format!("parsing metafile {}", metafile.display()))?
        }
        (None, Some(outdir)) => manifest_from_outdir(outdir)
            .with_context(|| format!("scanning output directory {}", outdir.display()))?,
        (None, None) => bail!("either an output directory or --metafile is required"),
    };

    tracing::debug!(outputs = manifest.outputs.len(), "loaded output manifest");
    let report = relink_outputs(&manifest).context("relocation pass failed")?;

    for miss in &report.unresolved {
        eprintln!(
            "warning: unresolved marker {}({}) in {}",
            assetlink::URL_MARKER,
            miss.identifier,
            miss.file
        );
    }
    println!(
        "relinked {} of {} outputs in {:.1?}",
        report.patched.len(),
        manifest.outputs.len(),
        started.elapsed()
    );

    Ok(())
}

/// Build a manifest snapshot by walking an output directory.
///
/// Covers drivers that emit no metafile: every file in the tree joins the
/// snapshot, and the relocation pass itself narrows the sweep to text
/// outputs.
fn manifest_from_outdir(outdir: &Path) -> Result<OutputManifest> {
    let mut manifest = OutputManifest::default();
    for entry in WalkDir::new(outdir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = entry.metadata()?.len();
        manifest.outputs.insert(
            entry.path().to_string_lossy().into_owned(),
            OutputMeta {
                bytes,
                entry_point: None,
            },
        );
    }
    Ok(manifest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn outdir_walk_matches_a_metafile_pass() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.js");
        fs::write(
            &app,
            "var bound = \"weights-9f3a.bin\";\nfetch(new URL(__ASSETLINK_URL__(bound), import.meta.url));\n",
        )
        .unwrap();
        fs::write(dir.path().join("weights-9f3a.bin"), b"bytes").unwrap();

        let manifest = manifest_from_outdir(dir.path()).unwrap();
        assert_eq!(manifest.outputs.len(), 2);

        let report = relink_outputs(&manifest).unwrap();
        assert_eq!(report.patched.len(), 1);

        let relinked = fs::read_to_string(&app).unwrap();
        assert!(relinked.contains("fetch(new URL(\"weights-9f3a.bin\", import.meta.url))"));
    }

    #[test]
    fn empty_outdir_yields_an_empty_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_from_outdir(dir.path()).unwrap();
        assert!(manifest.outputs.is_empty());
    }
}
