//! Post-build placeholder relocation.
//!
//! The deferred-fetch generator leaves `__ASSETLINK_URL__(ident)` markers in
//! its output because the final, content-hashed filename of a copied-out
//! asset does not exist until the whole build graph is emitted. This pass
//! runs once, strictly after the driver finalizes every output, and closes
//! that gap: for each text output it captures the filename the build
//! assigned to `ident` and rewrites the marker to a plain string literal, in
//! place.
//!
//! Substitution rules, per artifact:
//!
//! - every distinct marker identifier is resolved independently;
//! - an identifier resolves to the *first* assignment `ident = "literal"`
//!   in source order (the documented tie-break for colliding candidates);
//! - an identifier with no assignment is left in place - a relocation miss
//!   is not a build failure, it is reported and surfaces at runtime instead;
//! - the file is rewritten only when at least one marker resolved, so a
//!   second pass over already-relinked output is a byte-identical no-op.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::codegen::URL_MARKER;
use crate::error::Error;
use crate::hooks::OutputManifest;

/// Output extensions recognized as bundler text output.
const TEXT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

#[allow(clippy::expect_used)]
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{URL_MARKER}\(([A-Za-z0-9_]+)\)")).expect("marker pattern is valid")
});

#[allow(clippy::expect_used)]
static ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    // A plain string-literal assignment, the shape the driver emits for a
    // copied-out asset's filename binding.
    Regex::new(r#"([A-Za-z0-9_]+)\s*=\s*"([^"]*)""#).expect("assignment pattern is valid")
});

/// Outcome of one relocation sweep.
#[derive(Debug, Clone, Default)]
pub struct RelinkReport {
    /// Output files rewritten in place.
    pub patched: Vec<String>,
    /// Markers left unresolved because no assignment matched.
    pub unresolved: Vec<UnresolvedMarker>,
}

/// A marker the sweep could not substitute.
///
/// The build still succeeds; the marker will fail at runtime when evaluated
/// as a URL, which is why the sweep reports it here and logs a warning.
#[derive(Debug, Clone)]
pub struct UnresolvedMarker {
    /// Output file containing the marker.
    pub file: String,
    /// The marker's identifier operand.
    pub identifier: String,
}

/// Substitutions computed for a single artifact's text.
struct TextOutcome {
    rewritten: Option<String>,
    unresolved: Vec<String>,
}

/// Run the relocation pass over a completed build's outputs.
///
/// `manifest` is an immutable snapshot of the final output set; outputs are
/// visited in sorted path order and only text outputs are scanned. Artifacts
/// without markers are left untouched.
///
/// # Errors
///
/// Returns an error if a manifest-listed text output cannot be read or a
/// rewritten artifact cannot be persisted. Relocation misses are not errors.
pub fn relink_outputs(manifest: &OutputManifest) -> Result<RelinkReport, Error> {
    let mut report = RelinkReport::default();

    for path in manifest.outputs.keys() {
        if !is_text_output(path) {
            continue;
        }

        let text = fs::read_to_string(path).map_err(|source| Error::OutputRead {
            path: path.into(),
            source,
        })?;

        let outcome = relink_text(&text);

        for identifier in outcome.unresolved {
            tracing::warn!(
                file = %path,
                identifier = %identifier,
                "no filename assignment found for marker, leaving it unresolved"
            );
            report.unresolved.push(UnresolvedMarker {
                file: path.clone(),
                identifier,
            });
        }

        if let Some(rewritten) = outcome.rewritten {
            fs::write(path, rewritten).map_err(|source| Error::OutputWrite {
                path: path.into(),
                source,
            })?;
            tracing::debug!(file = %path, "relinked asset markers");
            report.patched.push(path.clone());
        }
    }

    tracing::info!(
        patched = report.patched.len(),
        unresolved = report.unresolved.len(),
        "relocation pass complete"
    );
    Ok(report)
}

/// Compute marker substitutions for one artifact's text.
fn relink_text(text: &str) -> TextOutcome {
    // Distinct marker identifiers, first-occurrence order.
    let mut idents: Vec<&str> = Vec::new();
    for caps in MARKER_RE.captures_iter(text) {
        if let Some(ident) = caps.get(1).map(|m| m.as_str())
            && !idents.contains(&ident)
        {
            idents.push(ident);
        }
    }
    if idents.is_empty() {
        return TextOutcome {
            rewritten: None,
            unresolved: Vec::new(),
        };
    }

    // First assignment per identifier, in source order. The generic scan
    // captures the whole identifier, so `my_wasm = "x"` can never satisfy a
    // lookup for `wasm`.
    let mut assignments: HashMap<&str, &str> = HashMap::new();
    for caps in ASSIGN_RE.captures_iter(text) {
        if let (Some(ident), Some(literal)) = (caps.get(1), caps.get(2)) {
            let ident = ident.as_str();
            if idents.contains(&ident) {
                assignments.entry(ident).or_insert(literal.as_str());
            }
        }
    }

    let unresolved: Vec<String> = idents
        .iter()
        .filter(|ident| !assignments.contains_key(*ident))
        .map(|ident| (*ident).to_string())
        .collect();

    if assignments.is_empty() {
        return TextOutcome {
            rewritten: None,
            unresolved,
        };
    }

    let rewritten = MARKER_RE.replace_all(text, |caps: &Captures<'_>| {
        let ident = &caps[1];
        match assignments.get(ident) {
            Some(literal) => format!("\"{literal}\""),
            None => caps[0].to_string(),
        }
    });

    TextOutcome {
        rewritten: Some(rewritten.into_owned()),
        unresolved,
    }
}

/// Whether an output path is bundler text output worth scanning.
fn is_text_output(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext))
}
