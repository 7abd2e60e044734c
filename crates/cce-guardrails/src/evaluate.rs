//! Guardrail evaluation
//!
//! Checks run in a fixed order over a single text blob built from the
//! caption, the CTA, and the hashtags: banned phrases first, then banned
//! claim patterns, then disclaimer requirements. Reasons are reported
//! exactly in detection order.

use cce_utils::types::DraftItem;

use crate::rules::CompiledGuardrails;

/// Result of evaluating one draft against the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// True when no violations were detected
    pub ok: bool,
    /// Ordered violation reasons, empty when `ok`
    pub reasons: Vec<String>,
}

impl CompiledGuardrails {
    /// Evaluate a draft against the rule set.
    ///
    /// Banned phrases match case-insensitively; claim patterns match the
    /// original-case text exactly as the rule is written. Trigger
    /// keywords force the disclaimer requirement on and are themselves
    /// reported as reasons.
    #[must_use]
    pub fn evaluate(&self, draft: &DraftItem, default_disclaimer: &str) -> Evaluation {
        let blob = format!(
            "{}\n{}\n{}",
            draft.caption,
            draft.cta,
            draft.hashtags.join(" ")
        );
        let lowered = blob.to_lowercase();

        let mut reasons = Vec::new();

        for phrase in &self.phrases {
            if lowered.contains(&phrase.lowered) {
                reasons.push(format!("Banned phrase detected: {}", phrase.literal));
            }
        }

        for claim in &self.claims {
            if claim.regex.is_match(&blob) {
                reasons.push(format!("Banned claim pattern matched: {}", claim.source));
            }
        }

        let mut disclaimer_required = self.always_disclaimer;
        for (keyword, keyword_lower) in &self.triggers {
            if lowered.contains(keyword_lower) {
                disclaimer_required = true;
                reasons.push(format!("Disclaimer required due to keyword: {keyword}"));
            }
        }

        if disclaimer_required
            && !draft
                .disclaimer
                .to_lowercase()
                .contains(&default_disclaimer.to_lowercase())
        {
            reasons.push("Default disclaimer missing".to_string());
        }

        Evaluation {
            ok: reasons.is_empty(),
            reasons,
        }
    }
}
