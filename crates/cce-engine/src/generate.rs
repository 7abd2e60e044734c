//! Generate stage: plan + chunk store → drafts
//!
//! For each plan item, in plan order: retrieve grounding chunks by
//! lexical overlap, compose the backend context, invoke the generation
//! backend (live or stub), and normalize the result into a canonical
//! draft record. Draft ids mirror plan ids 1:1.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use cce_config::{load_client_config, load_guardrails_config};
use cce_kb::{SourceChunk, retrieve};
use cce_llm::{
    BackendMode, DraftFields, GenerationBackend, GenerationRequest, Grounding, normalize_fields,
};
use cce_utils::types::{DraftItem, PlanDocument, PlanItem};
use cce_utils::{EngineError, persist};

use crate::paths::ClientPaths;

/// Substituted when the backend supplies no usable hashtags.
const DEFAULT_HASHTAGS: [&str; 5] = [
    "#ClinicEducation",
    "#PatientCare",
    "#Healthcare",
    "#Toronto",
    "#Wellness",
];

const SYSTEM_PROMPT: &str = "You are a medical clinic social content assistant. \
     Return strict JSON with keys: caption, hashtags, soft_cta, disclaimer, reel_script.";

/// Chunks requested from retrieval per plan item.
const RETRIEVE_TOP_K: usize = 5;

/// Outcome of the generate stage, for the CLI summary line.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    pub drafts: usize,
    pub mode: BackendMode,
    pub out_path: PathBuf,
}

fn compose_user_context(
    client: &cce_config::ClientConfig,
    guardrail_summary: &str,
    item: &PlanItem,
    default_disclaimer: &str,
    selected: &[&SourceChunk],
) -> String {
    let grounding_text = selected
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n---\n");

    format!(
        "Clinic: {}\n\
         Tone: {}\n\
         Platform: {}\n\
         Pillar: {}\n\
         Service: {}\n\
         Angle: {}\n\
         Target length: {}\n\
         Guardrails: {}\n\
         Default CTA options: {:?}\n\
         Default disclaimer: {}\n\
         Grounding chunks:\n{}",
        client.client_name,
        client.tone.style,
        item.platform,
        item.pillar,
        item.service,
        item.angle,
        item.target_length,
        guardrail_summary,
        client.ctas.soft,
        default_disclaimer,
        grounding_text,
    )
}

/// Run the generate stage for a client and month.
///
/// # Errors
///
/// Returns `EngineError::MissingArtifact` when the chunk store or plan
/// is absent, `EngineError::EmptyArtifact` when the plan holds no items,
/// and backend transport failures via `EngineError::Generation`.
pub async fn run_generate(
    client_dir: &Path,
    month: &str,
    backend: &dyn GenerationBackend,
) -> Result<GenerateSummary, EngineError> {
    let paths = ClientPaths::new(client_dir);
    let client = load_client_config(&paths.client_config())?;
    let guardrails = load_guardrails_config(&paths.guardrails_config())?;

    let kb_path = paths.kb_chunks();
    if !kb_path.is_file() {
        return Err(EngineError::MissingArtifact {
            what: "KB chunks file",
            predecessor: "ingest",
            path: kb_path,
        });
    }
    let kb_chunks: Vec<SourceChunk> = persist::read_jsonl(&kb_path)?;

    let plan_path = paths.plan_file(month);
    if !plan_path.is_file() {
        return Err(EngineError::MissingArtifact {
            what: "plan file",
            predecessor: "plan",
            path: plan_path,
        });
    }
    let plan: PlanDocument = persist::read_json(&plan_path)?;
    if plan.items.is_empty() {
        return Err(EngineError::EmptyArtifact {
            what: "plan items",
            path: plan_path,
        });
    }

    let guardrail_summary = guardrails.summary();
    let default_disclaimer = client.disclaimers.default.clone();
    let default_cta = client.default_cta().to_string();

    let mut drafts: Vec<DraftItem> = Vec::with_capacity(plan.items.len());
    for item in &plan.items {
        let query = format!("{} {} {}", item.pillar, item.service, item.angle);
        let retrieved = retrieve(&query, &kb_chunks, RETRIEVE_TOP_K);

        let selected: Vec<&SourceChunk> = if retrieved.is_empty() {
            kb_chunks.iter().take(2).collect()
        } else {
            let take = retrieved.len().min(RETRIEVE_TOP_K).max(2);
            retrieved.into_iter().take(take).collect()
        };

        debug!(id = %item.id, selected = selected.len(), "grounding selected");

        let request = GenerationRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: compose_user_context(
                &client,
                &guardrail_summary,
                item,
                &default_disclaimer,
                &selected,
            ),
            grounding: Grounding {
                client_name: client.client_name.clone(),
                service: item.service.clone(),
                angle: item.angle.clone(),
                cta: default_cta.clone(),
                disclaimer: default_disclaimer.clone(),
                chunk_excerpts: selected.iter().map(|c| c.text.clone()).collect(),
            },
        };

        let raw = backend.generate(&request).await?;
        let fallback = DraftFields {
            caption: String::new(),
            hashtags: Vec::new(),
            cta: default_cta.clone(),
            disclaimer: default_disclaimer.clone(),
            reel_script: Vec::new(),
        };
        let mut fields = normalize_fields(raw, &fallback);
        if fields.hashtags.is_empty() {
            fields.hashtags = DEFAULT_HASHTAGS.iter().map(ToString::to_string).collect();
        }

        drafts.push(DraftItem {
            id: item.id.clone(),
            platform: item.platform.clone(),
            pillar: item.pillar.clone(),
            service: item.service.clone(),
            angle: item.angle.clone(),
            caption: fields.caption,
            hashtags: fields.hashtags,
            cta: fields.cta,
            disclaimer: fields.disclaimer,
            reel_script: fields.reel_script,
            retrieved_chunks: selected.iter().map(|c| c.chunk_id.clone()).collect(),
        });
    }

    let out_path = paths.drafts_file(month);
    persist::write_jsonl(&out_path, &drafts)?;

    info!(
        drafts = drafts.len(),
        mode = %backend.mode(),
        "generate complete"
    );

    Ok(GenerateSummary {
        drafts: drafts.len(),
        mode: backend.mode(),
        out_path,
    })
}
