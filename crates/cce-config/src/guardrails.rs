//! Compliance rule set (`guardrails.yaml`)
//!
//! Banned phrases are literal strings matched case-insensitively; banned
//! claim patterns are regular expressions matched as written. Disclaimer
//! rules combine an always-required flag with keyword triggers.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// High-level medical-safety flags.
///
/// These are guidance for the generation prompt; enforcement happens via
/// the phrase and pattern rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalSafetyRules {
    #[serde(default = "default_true")]
    pub require_balanced_language: bool,
    #[serde(default = "default_true")]
    pub avoid_diagnosis_language: bool,
    #[serde(default = "default_true")]
    pub avoid_outcome_promises: bool,
    #[serde(default)]
    pub avoid_specific_treatment_advice: Option<bool>,
    #[serde(default)]
    pub avoid_before_after_encouragement: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeforeAfterPolicy {
    #[serde(default)]
    pub allowed_in_organic: Option<String>,
    #[serde(default)]
    pub allowed_in_promoted_ads: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclaimerRules {
    #[serde(default = "default_true")]
    pub always_include_default_disclaimer: bool,
    #[serde(default)]
    pub must_include_disclaimer_if_keywords: Vec<String>,
}

/// Compliance rule set, loaded once per run, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsConfig {
    pub region: String,
    pub profile: String,
    #[serde(default)]
    pub banned_phrases: Vec<String>,
    #[serde(default)]
    pub banned_claim_patterns: Vec<String>,
    pub medical_safety_rules: MedicalSafetyRules,
    #[serde(default)]
    pub before_after_policy: Option<BeforeAfterPolicy>,
    pub disclaimer_rules: DisclaimerRules,
}

impl GuardrailsConfig {
    /// Human-readable reduction of the rule set.
    ///
    /// Used as generation guidance in the backend prompt, not for
    /// enforcement.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Banned phrases: {:?}. Banned claim regex: {:?}. \
             Always include default disclaimer: {}. \
             Keywords requiring disclaimer: {:?}.",
            self.banned_phrases,
            self.banned_claim_patterns,
            self.disclaimer_rules.always_include_default_disclaimer,
            self.disclaimer_rules.must_include_disclaimer_if_keywords,
        )
    }
}
