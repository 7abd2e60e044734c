//! Review stage: drafts → compliance-checked items
//!
//! Drives the guardrail evaluator and the rewriter over every draft of a
//! run, in plan order. Each draft lands in exactly one terminal state:
//!
//! - `PASS`: no violations; original fields ship as-is.
//! - `FIXED`: violations, live backend available; the assisted rewrite's
//!   fields ship (falling back per-field to the originals).
//! - `FAIL`: violations, no backend; the deterministic local repair is
//!   attached as a suggestion but the status stays FAIL because the
//!   repair is unverified.
//!
//! No draft is ever dropped; compliance violations are outcomes, not
//! errors.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use cce_config::{load_client_config, load_guardrails_config};
use cce_guardrails::CompiledGuardrails;
use cce_llm::{
    BackendMode, DraftFields, GenerationBackend, GenerationRequest, Grounding, normalize_fields,
};
use cce_utils::types::{DraftItem, ReviewStatus, ReviewedItem};
use cce_utils::{EngineError, persist};

use crate::paths::ClientPaths;

const REWRITE_SYSTEM_PROMPT: &str = "You fix medical content for compliance. \
     Return strict JSON with caption, hashtags, cta, disclaimer, reel_script.";

const SUGGESTED_FIX_NOTE: &str = "Suggested fix provided in final_caption/final_disclaimer.";

/// Outcome of the review stage, for the CLI summary line.
#[derive(Debug, Clone)]
pub struct ReviewSummary {
    pub total: usize,
    pub compliant: usize,
    pub mode: BackendMode,
    pub out_path: PathBuf,
}

fn compose_rewrite_context(draft: &DraftItem, reasons: &[String], default_disclaimer: &str) -> String {
    format!(
        "Reasons to fix: {reasons:?}\n\
         Original caption: {}\n\
         Original hashtags: {:?}\n\
         Original CTA: {}\n\
         Original disclaimer: {}\n\
         Required default disclaimer: {default_disclaimer}",
        draft.caption, draft.hashtags, draft.cta, draft.disclaimer,
    )
}

/// Run the review stage for a client and month.
///
/// # Errors
///
/// Returns `EngineError::MissingArtifact`/`EmptyArtifact` when the
/// drafts file is absent or empty, `EngineError::ClaimPattern` for an
/// invalid rule regex, and backend transport failures via
/// `EngineError::Generation`.
pub async fn run_review(
    client_dir: &Path,
    month: &str,
    backend: &dyn GenerationBackend,
) -> Result<ReviewSummary, EngineError> {
    let paths = ClientPaths::new(client_dir);
    let client = load_client_config(&paths.client_config())?;
    let guardrails = load_guardrails_config(&paths.guardrails_config())?;
    let rules = CompiledGuardrails::new(&guardrails)?;

    let drafts_path = paths.drafts_file(month);
    if !drafts_path.is_file() {
        return Err(EngineError::MissingArtifact {
            what: "drafts file",
            predecessor: "generate",
            path: drafts_path,
        });
    }
    let drafts: Vec<DraftItem> = persist::read_jsonl(&drafts_path)?;
    if drafts.is_empty() {
        return Err(EngineError::EmptyArtifact {
            what: "drafts",
            path: drafts_path,
        });
    }

    let default_disclaimer = client.disclaimers.default.clone();
    let mut reviewed: Vec<ReviewedItem> = Vec::with_capacity(drafts.len());

    for draft in &drafts {
        let evaluation = rules.evaluate(draft, &default_disclaimer);
        let mut reasons = evaluation.reasons;

        let (status, fields) = if reasons.is_empty() {
            let disclaimer = if draft.disclaimer.is_empty() {
                default_disclaimer.clone()
            } else {
                draft.disclaimer.clone()
            };
            (
                ReviewStatus::Pass,
                DraftFields {
                    caption: draft.caption.clone(),
                    hashtags: draft.hashtags.clone(),
                    cta: draft.cta.clone(),
                    disclaimer,
                    reel_script: draft.reel_script.clone(),
                },
            )
        } else if backend.mode() == BackendMode::Live {
            let request = GenerationRequest {
                system: REWRITE_SYSTEM_PROMPT.to_string(),
                user: compose_rewrite_context(draft, &reasons, &default_disclaimer),
                grounding: Grounding {
                    client_name: client.client_name.clone(),
                    service: draft.service.clone(),
                    angle: draft.angle.clone(),
                    cta: draft.cta.clone(),
                    disclaimer: default_disclaimer.clone(),
                    chunk_excerpts: Vec::new(),
                },
            };
            let raw = backend.generate(&request).await?;
            let fallback = DraftFields {
                caption: draft.caption.clone(),
                hashtags: draft.hashtags.clone(),
                cta: draft.cta.clone(),
                disclaimer: draft.disclaimer.clone(),
                reel_script: draft.reel_script.clone(),
            };
            (ReviewStatus::Fixed, normalize_fields(raw, &fallback))
        } else {
            let repaired = rules.repair(&draft.caption, &draft.disclaimer, &default_disclaimer);
            reasons.push(SUGGESTED_FIX_NOTE.to_string());
            (
                ReviewStatus::Fail,
                DraftFields {
                    caption: repaired.caption,
                    hashtags: draft.hashtags.clone(),
                    cta: draft.cta.clone(),
                    disclaimer: repaired.disclaimer,
                    reel_script: draft.reel_script.clone(),
                },
            )
        };

        debug!(id = %draft.id, status = %status, reasons = reasons.len(), "draft reviewed");

        reviewed.push(ReviewedItem {
            id: draft.id.clone(),
            platform: draft.platform.clone(),
            pillar: draft.pillar.clone(),
            service: draft.service.clone(),
            status,
            reasons,
            final_caption: fields.caption,
            final_hashtags: fields.hashtags,
            final_cta: fields.cta,
            final_disclaimer: fields.disclaimer,
            reel_script: fields.reel_script,
        });
    }

    let out_path = paths.reviewed_file(month);
    persist::write_jsonl(&out_path, &reviewed)?;

    let compliant = reviewed
        .iter()
        .filter(|item| item.status.is_compliant())
        .count();

    info!(
        total = reviewed.len(),
        compliant,
        mode = %backend.mode(),
        "review complete"
    );

    Ok(ReviewSummary {
        total: reviewed.len(),
        compliant,
        mode: backend.mode(),
        out_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cce_llm::{GenerationError, RawFields, StringOrList, StubBackend};

    const CLIENT_YAML: &str = r#"
client_name: Avalon Medical
location: Toronto, ON
primary_platforms: [instagram]
tone:
  style: warm
  reading_level: grade 8
content_strategy:
  pillars:
    - name: Safety & Trust
      description: safe visits
  cadence:
    posts_per_week: 3
services: [Consultations]
ctas:
  soft: [Book a consult]
disclaimers:
  default: Educational information only - not medical advice.
links:
  homepage: https://avalon.example
  booking: https://avalon.example/book
"#;

    const STRICT_GUARDRAILS_YAML: &str = r#"
region: Ontario, Canada
profile: test
banned_phrases: [guaranteed]
banned_claim_patterns: []
medical_safety_rules:
  require_balanced_language: true
  avoid_diagnosis_language: true
  avoid_outcome_promises: true
disclaimer_rules:
  always_include_default_disclaimer: true
  must_include_disclaimer_if_keywords: []
"#;

    fn draft(id: &str, caption: &str) -> DraftItem {
        DraftItem {
            id: id.to_string(),
            platform: "instagram".to_string(),
            pillar: "Safety & Trust".to_string(),
            service: "Consultations".to_string(),
            angle: "what to expect".to_string(),
            caption: caption.to_string(),
            hashtags: vec!["#care".to_string()],
            cta: "Book a consult".to_string(),
            disclaimer: "Educational information only - not medical advice.".to_string(),
            reel_script: vec!["Hook".to_string()],
            retrieved_chunks: vec![],
        }
    }

    fn write_fixture(dir: &Path, guardrails_yaml: &str, drafts: &[DraftItem]) {
        std::fs::write(dir.join("client.yaml"), CLIENT_YAML).unwrap();
        std::fs::write(dir.join("guardrails.yaml"), guardrails_yaml).unwrap();
        persist::write_jsonl(&dir.join("runs").join("2025-06").join("drafts.jsonl"), drafts)
            .unwrap();
    }

    /// Live backend double that always rewrites the caption.
    struct RewritingBackend;

    #[async_trait]
    impl GenerationBackend for RewritingBackend {
        fn mode(&self) -> BackendMode {
            BackendMode::Live
        }

        async fn generate(&self, _req: &GenerationRequest) -> Result<RawFields, GenerationError> {
            Ok(RawFields {
                caption: Some("A careful, compliant caption.".to_string()),
                hashtags: Some(StringOrList::List(vec!["#safe".to_string()])),
                ..RawFields::default()
            })
        }
    }

    #[tokio::test]
    async fn missing_drafts_file_is_a_precondition_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("client.yaml"), CLIENT_YAML).unwrap();
        std::fs::write(dir.path().join("guardrails.yaml"), STRICT_GUARDRAILS_YAML).unwrap();

        let err = run_review(dir.path(), "2025-06", &StubBackend::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingArtifact { .. }));
        assert!(err.to_string().contains("generate"));
    }

    #[tokio::test]
    async fn empty_drafts_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), STRICT_GUARDRAILS_YAML, &[]);

        let err = run_review(dir.path(), "2025-06", &StubBackend::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyArtifact { .. }));
    }

    #[tokio::test]
    async fn clean_draft_passes_with_original_fields() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            STRICT_GUARDRAILS_YAML,
            &[draft("202506-001", "What to expect at your first visit.")],
        );

        let summary = run_review(dir.path(), "2025-06", &StubBackend::new())
            .await
            .unwrap();
        assert_eq!(summary.compliant, 1);

        let reviewed: Vec<ReviewedItem> = persist::read_jsonl(&summary.out_path).unwrap();
        assert_eq!(reviewed[0].status, ReviewStatus::Pass);
        assert!(reviewed[0].reasons.is_empty());
        assert_eq!(
            reviewed[0].final_caption,
            "What to expect at your first visit."
        );
    }

    #[tokio::test]
    async fn violation_without_backend_fails_with_suggested_repair() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            STRICT_GUARDRAILS_YAML,
            &[draft("202506-001", "This plan is guaranteed to help.")],
        );

        let summary = run_review(dir.path(), "2025-06", &StubBackend::new())
            .await
            .unwrap();
        assert_eq!(summary.compliant, 0);

        let reviewed: Vec<ReviewedItem> = persist::read_jsonl(&summary.out_path).unwrap();
        assert_eq!(reviewed[0].status, ReviewStatus::Fail);
        assert!(
            reviewed[0]
                .reasons
                .iter()
                .any(|r| r.contains("Banned phrase detected"))
        );
        assert_eq!(
            reviewed[0].reasons.last().map(String::as_str),
            Some(SUGGESTED_FIX_NOTE)
        );
        // Best-effort local repair is attached, banned token stripped.
        assert_eq!(reviewed[0].final_caption, "This plan is to help.");
        // Hashtags, CTA, and reel script are untouched by local repair.
        assert_eq!(reviewed[0].final_hashtags, vec!["#care"]);
        assert_eq!(reviewed[0].final_cta, "Book a consult");
        assert_eq!(reviewed[0].reel_script, vec!["Hook"]);
    }

    #[tokio::test]
    async fn violation_with_live_backend_is_fixed() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            STRICT_GUARDRAILS_YAML,
            &[draft("202506-001", "This plan is guaranteed to help.")],
        );

        let summary = run_review(dir.path(), "2025-06", &RewritingBackend)
            .await
            .unwrap();
        assert_eq!(summary.compliant, 1);

        let reviewed: Vec<ReviewedItem> = persist::read_jsonl(&summary.out_path).unwrap();
        assert_eq!(reviewed[0].status, ReviewStatus::Fixed);
        assert_eq!(reviewed[0].final_caption, "A careful, compliant caption.");
        assert_eq!(reviewed[0].final_hashtags, vec!["#safe"]);
        // Fields the rewrite omitted fall back to the originals.
        assert_eq!(reviewed[0].final_cta, "Book a consult");
        assert_eq!(reviewed[0].reel_script, vec!["Hook"]);
    }

    #[tokio::test]
    async fn empty_disclaimer_defaults_on_pass() {
        let dir = tempfile::tempdir().unwrap();
        let mut item = draft("202506-001", "What to expect at your first visit.");
        item.disclaimer = String::new();

        // Permissive rules so the empty disclaimer is not itself a violation.
        let permissive = r#"
region: Ontario, Canada
profile: test
banned_phrases: []
banned_claim_patterns: []
medical_safety_rules:
  require_balanced_language: true
  avoid_diagnosis_language: true
  avoid_outcome_promises: true
disclaimer_rules:
  always_include_default_disclaimer: false
  must_include_disclaimer_if_keywords: []
"#;
        write_fixture(dir.path(), permissive, &[item]);

        let summary = run_review(dir.path(), "2025-06", &StubBackend::new())
            .await
            .unwrap();
        let reviewed: Vec<ReviewedItem> = persist::read_jsonl(&summary.out_path).unwrap();
        assert_eq!(reviewed[0].status, ReviewStatus::Pass);
        assert_eq!(
            reviewed[0].final_disclaimer,
            "Educational information only - not medical advice."
        );
    }
}
