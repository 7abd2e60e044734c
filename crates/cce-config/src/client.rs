//! Tenant profile (`client.yaml`)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A content theme category in the client's strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pillar {
    pub name: String,
    pub description: String,
}

/// Posting cadence: weekly volume plus a per-platform weight mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cadence {
    pub posts_per_week: u32,
    /// Platform → weight. A BTreeMap keeps remainder distribution
    /// deterministic when weights tie.
    #[serde(default)]
    pub mix: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentStrategy {
    pub pillars: Vec<Pillar>,
    pub cadence: Cadence,
}

/// Voice guidance passed to the generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tone {
    pub style: String,
    pub reading_level: String,
    #[serde(rename = "do", default)]
    pub dos: Vec<String>,
    #[serde(rename = "dont", default)]
    pub donts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ctas {
    #[serde(default)]
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disclaimers {
    pub default: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Links {
    pub homepage: String,
    pub booking: String,
}

/// Tenant profile, loaded once per run, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_name: String,
    pub location: String,
    #[serde(default)]
    pub primary_platforms: Vec<String>,
    #[serde(default)]
    pub secondary_platforms: Vec<String>,
    pub tone: Tone,
    pub content_strategy: ContentStrategy,
    #[serde(default)]
    pub services: Vec<String>,
    pub ctas: Ctas,
    pub disclaimers: Disclaimers,
    pub links: Links,
}

impl ClientConfig {
    /// First configured soft CTA, with a neutral fallback when none are set.
    #[must_use]
    pub fn default_cta(&self) -> &str {
        self.ctas
            .soft
            .first()
            .map_or("Contact us to learn more", String::as_str)
    }
}
