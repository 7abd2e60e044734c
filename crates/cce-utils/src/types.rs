//! Domain records shared across pipeline stages
//!
//! These are the persisted artifact shapes: a `PlanItem` is consumed by
//! generation, a `DraftItem` by review, and a `ReviewedItem` by export.
//! Ids correspond 1:1 down the chain, in plan order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested caption length for a planned post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLength {
    Short,
    Medium,
    Long,
}

impl fmt::Display for TargetLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Medium => write!(f, "medium"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// A single scheduled content piece, produced by the planner.
///
/// Consumed, never mutated, by generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    pub pillar: String,
    pub service: String,
    pub platform: String,
    pub angle: String,
    pub target_length: TargetLength,
}

/// The monthly plan document (`plan.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    pub month: String,
    #[serde(default)]
    pub items: Vec<PlanItem>,
}

/// First-pass generated content for a plan item.
///
/// `id` mirrors the source `PlanItem` id. `hashtags` is capped at 10 on
/// write; `retrieved_chunks` records the grounding chunk ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftItem {
    pub id: String,
    pub platform: String,
    pub pillar: String,
    pub service: String,
    pub angle: String,
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub cta: String,
    pub disclaimer: String,
    #[serde(default)]
    pub reel_script: Vec<String>,
    #[serde(default)]
    pub retrieved_chunks: Vec<String>,
}

/// Terminal review status of a draft.
///
/// `Fail` is never auto-upgraded to `Fixed`: the deterministic local
/// repair is unverified, so its output ships only as a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewStatus {
    Pass,
    Fail,
    Fixed,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Fixed => write!(f, "FIXED"),
        }
    }
}

impl ReviewStatus {
    /// PASS and FIXED items count as compliant in the audit summary.
    #[must_use]
    pub fn is_compliant(self) -> bool {
        matches!(self, Self::Pass | Self::Fixed)
    }
}

/// Final, compliance-checked content for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewedItem {
    pub id: String,
    pub platform: String,
    pub pillar: String,
    pub service: String,
    pub status: ReviewStatus,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub final_caption: String,
    #[serde(default)]
    pub final_hashtags: Vec<String>,
    pub final_cta: String,
    pub final_disclaimer: String,
    #[serde(default)]
    pub reel_script: Vec<String>,
}
