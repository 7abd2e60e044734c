//! Ingest stage: source documents → chunk store
//!
//! Walks `<client>/sources` for `.txt`/`.md` files, normalizes
//! whitespace, and splits each document into overlapping chunks with
//! deterministic ids. Re-ingesting unchanged sources reproduces an
//! identical chunk store.

use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use cce_kb::{ChunkParams, SourceChunk, chunk_id, chunk_text};
use cce_utils::{EngineError, persist, text::clean_text};

use crate::paths::ClientPaths;

/// Outcome of the ingest stage, for the CLI summary line.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub source_files: usize,
    pub chunks: usize,
    pub out_path: PathBuf,
}

/// Source files eligible for ingestion, sorted by path.
///
/// Returns an empty list when the sources directory does not exist;
/// [`run_ingest`] treats that as a precondition failure, while the audit
/// counter in export treats it as zero.
pub(crate) fn source_files(sources_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(sources_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    let ext = ext.to_lowercase();
                    ext == "txt" || ext == "md"
                })
        })
        .collect();
    files.sort();
    files
}

/// Run the ingest stage for a client.
///
/// # Errors
///
/// Returns `EngineError::MissingSources` when the sources directory is
/// absent, `EngineError::EmptyArtifact` when it holds no `.txt`/`.md`
/// files, `EngineError::ChunkOverlap` for invalid chunk parameters, and
/// IO errors from reading or writing.
pub fn run_ingest(client_dir: &Path, params: &ChunkParams) -> Result<IngestSummary, EngineError> {
    let paths = ClientPaths::new(client_dir);
    let sources_dir = paths.sources_dir();

    if !sources_dir.is_dir() {
        return Err(EngineError::MissingSources { path: sources_dir });
    }

    let files = source_files(&sources_dir);
    if files.is_empty() {
        return Err(EngineError::EmptyArtifact {
            what: ".txt/.md source files",
            path: sources_dir,
        });
    }

    let mut chunks: Vec<SourceChunk> = Vec::new();
    for file in &files {
        let raw = std::fs::read_to_string(file)?;
        let normalized = clean_text(&raw);
        let stem = file
            .file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().to_string());
        let source_file = file
            .strip_prefix(client_dir)
            .unwrap_or(file)
            .to_string_lossy()
            .to_string();

        for (idx, text) in chunk_text(&normalized, params)?.into_iter().enumerate() {
            chunks.push(SourceChunk {
                source_file: source_file.clone(),
                chunk_id: chunk_id(&stem, idx),
                text,
            });
        }
    }

    let out_path = paths.kb_chunks();
    persist::write_jsonl(&out_path, &chunks)?;

    info!(
        source_files = files.len(),
        chunks = chunks.len(),
        "ingest complete"
    );

    Ok(IngestSummary {
        source_files: files.len(),
        chunks: chunks.len(),
        out_path,
    })
}
