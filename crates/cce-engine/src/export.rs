//! Export stage: reviewed items → deliverables
//!
//! Produces the client-facing artifacts: a posts table (CSV), a
//! plain-text reel-script dump grouped by item, and an audit summary
//! with run counts, the compliance pass rate, and which backend mode
//! produced the content. FAIL items are exported unchanged (with their
//! best-effort local patch in the final fields); the status column is
//! the consumer's signal to hold them back.

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use cce_kb::SourceChunk;
use cce_llm::BackendMode;
use cce_utils::types::{PlanDocument, ReviewedItem};
use cce_utils::{EngineError, persist};

use crate::ingest::source_files;
use crate::paths::ClientPaths;

/// Outcome of the export stage, for the CLI summary lines.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub posts: usize,
    pub pass_rate: f64,
    pub posts_csv: PathBuf,
    pub reels_txt: PathBuf,
    pub audit_json: PathBuf,
}

/// Audit record written alongside the deliverables.
#[derive(Debug, Serialize)]
struct AuditLog {
    client: String,
    month: String,
    number_of_sources: usize,
    number_of_chunks: usize,
    number_of_posts: usize,
    pass_rate: f64,
    timestamp_utc: String,
    stub_mode: bool,
}

fn render_posts_csv(reviewed: &[ReviewedItem], out_path: &Path) -> Result<String, EngineError> {
    let to_engine_err = |reason: String| EngineError::Malformed {
        path: out_path.to_path_buf(),
        reason,
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "platform",
            "pillar",
            "service",
            "caption",
            "hashtags",
            "cta",
            "disclaimer",
            "status",
        ])
        .map_err(|e| to_engine_err(e.to_string()))?;

    for item in reviewed {
        let hashtags = item.final_hashtags.join(" ");
        let status = item.status.to_string();
        writer
            .write_record([
                item.platform.as_str(),
                item.pillar.as_str(),
                item.service.as_str(),
                item.final_caption.as_str(),
                hashtags.as_str(),
                item.final_cta.as_str(),
                item.final_disclaimer.as_str(),
                status.as_str(),
            ])
            .map_err(|e| to_engine_err(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| to_engine_err(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| to_engine_err(e.to_string()))
}

fn render_reel_scripts(reviewed: &[ReviewedItem]) -> String {
    let mut body = String::new();
    for item in reviewed {
        body.push_str(&format!(
            "=== {} | {} | {} | {} ===\n",
            item.id, item.platform, item.pillar, item.service
        ));
        if item.reel_script.is_empty() {
            body.push_str("- No reel script generated.\n");
        } else {
            for line in &item.reel_script {
                body.push_str(&format!("- {line}\n"));
            }
        }
        body.push('\n');
    }
    body
}

/// Run the export stage for a client and month.
///
/// # Errors
///
/// Returns `EngineError::MissingArtifact`/`EmptyArtifact` when the
/// reviewed file is absent or empty, plus IO failures from writing the
/// deliverables.
pub fn run_export(
    client_dir: &Path,
    month: &str,
    mode: BackendMode,
) -> Result<ExportSummary, EngineError> {
    let paths = ClientPaths::new(client_dir);

    let reviewed_path = paths.reviewed_file(month);
    if !reviewed_path.is_file() {
        return Err(EngineError::MissingArtifact {
            what: "reviewed file",
            predecessor: "review",
            path: reviewed_path,
        });
    }
    let reviewed: Vec<ReviewedItem> = persist::read_jsonl(&reviewed_path)?;
    if reviewed.is_empty() {
        return Err(EngineError::EmptyArtifact {
            what: "reviewed posts",
            path: reviewed_path,
        });
    }

    let deliverables = paths.deliverables_dir(month);
    let posts_csv = deliverables.join("posts.csv");
    let reels_txt = deliverables.join("reels_scripts.txt");
    let audit_json = deliverables.join("audit_log.json");

    persist::write_text_atomic(&posts_csv, &render_posts_csv(&reviewed, &posts_csv)?)?;
    persist::write_text_atomic(&reels_txt, &render_reel_scripts(&reviewed))?;

    let number_of_sources = source_files(&paths.sources_dir()).len();
    let kb_path = paths.kb_chunks();
    let number_of_chunks = if kb_path.is_file() {
        persist::read_jsonl::<SourceChunk>(&kb_path)?.len()
    } else {
        0
    };
    let plan_path = paths.plan_file(month);
    let number_of_posts = if plan_path.is_file() {
        persist::read_json::<PlanDocument>(&plan_path)?.items.len()
    } else {
        reviewed.len()
    };

    let compliant = reviewed
        .iter()
        .filter(|item| item.status.is_compliant())
        .count();
    let pass_rate = ((compliant as f64 / reviewed.len() as f64) * 10_000.0).round() / 10_000.0;

    persist::write_json(
        &audit_json,
        &AuditLog {
            client: paths.client_id(),
            month: month.to_string(),
            number_of_sources,
            number_of_chunks,
            number_of_posts,
            pass_rate,
            timestamp_utc: Utc::now().to_rfc3339(),
            stub_mode: mode == BackendMode::Stub,
        },
    )?;

    info!(posts = reviewed.len(), pass_rate, "export complete");

    Ok(ExportSummary {
        posts: reviewed.len(),
        pass_rate,
        posts_csv,
        reels_txt,
        audit_json,
    })
}
