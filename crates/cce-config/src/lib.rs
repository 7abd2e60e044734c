//! Client and guardrail profile configuration
//!
//! Two YAML files live at the root of every client directory:
//! `client.yaml` (tenant profile: tone, pillars, cadence, CTAs,
//! disclaimers) and `guardrails.yaml` (the compliance rule set). Both are
//! loaded once per run and are immutable afterwards.

mod client;
mod guardrails;

pub use client::{
    Cadence, ClientConfig, ContentStrategy, Ctas, Disclaimers, Links, Pillar, Tone,
};
pub use guardrails::{
    BeforeAfterPolicy, DisclaimerRules, GuardrailsConfig, MedicalSafetyRules,
};

use cce_utils::EngineError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load `client.yaml` from `path`.
///
/// # Errors
///
/// Returns `EngineError::MissingConfig` if the file does not exist and
/// `EngineError::ConfigParse` (naming the path) if it does not decode.
pub fn load_client_config(path: &Path) -> Result<ClientConfig, EngineError> {
    load_yaml(path)
}

/// Load `guardrails.yaml` from `path`.
///
/// # Errors
///
/// Same failure modes as [`load_client_config`].
pub fn load_guardrails_config(path: &Path) -> Result<GuardrailsConfig, EngineError> {
    load_yaml(path)
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    if !path.exists() {
        return Err(EngineError::MissingConfig {
            path: path.to_path_buf(),
        });
    }
    let body = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&body).map_err(|e| EngineError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT_YAML: &str = r#"
client_name: Avalon Medical
location: Toronto, ON
primary_platforms: [instagram, tiktok]
secondary_platforms: [linkedin]
tone:
  style: warm, plain-spoken
  reading_level: grade 8
  do: [use first person plural]
  dont: [promise outcomes]
content_strategy:
  pillars:
    - name: Safety & Trust
      description: how we keep visits safe
    - name: Myths vs Facts
      description: debunking common myths
  cadence:
    posts_per_week: 3
    mix:
      instagram: 0.6
      linkedin: 0.4
services: [Consultations, Physiotherapy]
ctas:
  soft: [Book a consult, Send us a message]
disclaimers:
  default: Educational information only - not medical advice.
links:
  homepage: https://avalon.example
  booking: https://avalon.example/book
"#;

    const GUARDRAILS_YAML: &str = r#"
region: Ontario, Canada
profile: conservative
banned_phrases: [guaranteed, risk-free]
banned_claim_patterns:
  - '(?i)results\s+in\s+\d+\s+days\b'
medical_safety_rules:
  require_balanced_language: true
  avoid_diagnosis_language: true
  avoid_outcome_promises: true
disclaimer_rules:
  always_include_default_disclaimer: true
  must_include_disclaimer_if_keywords: [results, recovery]
"#;

    #[test]
    fn client_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        std::fs::write(&path, CLIENT_YAML).unwrap();

        let client = load_client_config(&path).unwrap();
        assert_eq!(client.client_name, "Avalon Medical");
        assert_eq!(client.content_strategy.pillars.len(), 2);
        assert_eq!(client.content_strategy.cadence.posts_per_week, 3);
        assert_eq!(client.default_cta(), "Book a consult");
        assert_eq!(client.tone.dos.len(), 1);
    }

    #[test]
    fn guardrails_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guardrails.yaml");
        std::fs::write(&path, GUARDRAILS_YAML).unwrap();

        let rules = load_guardrails_config(&path).unwrap();
        assert_eq!(rules.banned_phrases.len(), 2);
        assert_eq!(rules.banned_claim_patterns.len(), 1);
        assert!(rules.disclaimer_rules.always_include_default_disclaimer);
        assert!(rules.before_after_policy.is_none());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_client_config(Path::new("/nonexistent/client.yaml")).unwrap_err();
        assert!(err.to_string().contains("client.yaml"));
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        std::fs::write(&path, "client_name: [unclosed").unwrap();

        let err = load_client_config(&path).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }

    #[test]
    fn guardrail_summary_mentions_every_rule_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guardrails.yaml");
        std::fs::write(&path, GUARDRAILS_YAML).unwrap();

        let rules = load_guardrails_config(&path).unwrap();
        let summary = rules.summary();
        assert!(summary.contains("guaranteed"));
        assert!(summary.contains("results"));
        assert!(summary.contains("disclaimer"));
    }
}
