//! Deterministic local repair
//!
//! The no-backend repair strategy: strip banned tokens from the caption
//! and substitute the default disclaimer. Hashtags, CTA, and reel script
//! are left untouched. Re-applying to already-repaired text changes
//! nothing. The output is a best-effort suggestion, not verified
//! compliant content; review keeps the item's status at FAIL.

use cce_utils::text::clean_text;

use crate::rules::CompiledGuardrails;

/// Caption and disclaimer after local repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairedFields {
    pub caption: String,
    pub disclaimer: String,
}

impl CompiledGuardrails {
    /// Apply the deterministic strip-and-substitute repair.
    ///
    /// Every banned-phrase occurrence is removed case-insensitively,
    /// every claim-pattern match is removed, and the resulting
    /// whitespace is collapsed after each pass. The disclaimer is
    /// replaced with the default only when the default is not already a
    /// case-insensitive substring of the current one.
    #[must_use]
    pub fn repair(
        &self,
        caption: &str,
        disclaimer: &str,
        default_disclaimer: &str,
    ) -> RepairedFields {
        let mut fixed = caption.to_string();

        for phrase in &self.phrases {
            fixed = phrase.strip.replace_all(&fixed, "").into_owned();
        }
        fixed = clean_text(&fixed);

        for claim in &self.claims {
            fixed = claim.regex.replace_all(&fixed, "").into_owned();
        }
        fixed = clean_text(&fixed);

        let fixed_disclaimer = if disclaimer
            .to_lowercase()
            .contains(&default_disclaimer.to_lowercase())
        {
            disclaimer.to_string()
        } else {
            default_disclaimer.to_string()
        };

        RepairedFields {
            caption: fixed,
            disclaimer: fixed_disclaimer,
        }
    }
}
