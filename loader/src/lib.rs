//! Document-loading collaborator: flattens a folder of plain-text files
//! into the raw strings the retrieval core consumes. Container-format
//! extraction (PDF, word processor) is out of scope; only plain text is
//! accepted here.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use temubalik_core::Document;
use walkdir::WalkDir;

const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Read every text document under `dir` (recursively) into memory.
/// Files with other extensions and files that are blank after decoding
/// are skipped. Documents come back sorted by file name so corpus order
/// is stable across runs.
pub fn load_directory<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("document folder {} does not exist", dir.display());
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            continue;
        }
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        // Lossy decode keeps legacy-encoded files usable instead of
        // failing the whole upload.
        let text = String::from_utf8_lossy(&bytes).into_owned();
        if text.trim().is_empty() {
            tracing::warn!(path = %path.display(), "skipping blank document");
            continue;
        }
        let id = path.file_name().unwrap_or_default().to_string_lossy().into_owned();
        documents.push(Document { id, text });
    }

    documents.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!(count = documents.len(), dir = %dir.display(), "loaded documents");
    Ok(documents)
}
