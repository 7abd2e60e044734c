//! Rule-set compilation
//!
//! Regexes are compiled once per run. An invalid banned-claim pattern is
//! a configuration error raised here, before any draft is evaluated.

use cce_config::GuardrailsConfig;
use cce_utils::EngineError;
use regex::Regex;

/// A banned phrase with its precomputed matching forms.
#[derive(Debug)]
pub(crate) struct PhraseRule {
    /// Original casing, used in violation reasons
    pub literal: String,
    /// Lowercased form for case-insensitive substring detection
    pub lowered: String,
    /// Case-insensitive literal matcher used by the repair pass
    pub strip: Regex,
}

/// A banned claim pattern compiled from the rule set.
#[derive(Debug)]
pub(crate) struct ClaimRule {
    /// Pattern source as declared, used in violation reasons
    pub source: String,
    pub regex: Regex,
}

/// The guardrail profile with all patterns compiled, ready for
/// evaluation and repair.
#[derive(Debug)]
pub struct CompiledGuardrails {
    pub(crate) phrases: Vec<PhraseRule>,
    pub(crate) claims: Vec<ClaimRule>,
    pub(crate) always_disclaimer: bool,
    /// (declared casing, lowered) per trigger keyword
    pub(crate) triggers: Vec<(String, String)>,
}

impl CompiledGuardrails {
    /// Compile a rule set.
    ///
    /// Rule order is preserved: violation reasons are reported in the
    /// order rules are declared.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ClaimPattern` for an invalid banned-claim
    /// regex.
    pub fn new(rules: &GuardrailsConfig) -> Result<Self, EngineError> {
        let phrases = rules
            .banned_phrases
            .iter()
            .map(|literal| {
                let strip = Regex::new(&format!("(?i){}", regex::escape(literal))).map_err(
                    |e| EngineError::ClaimPattern {
                        pattern: literal.clone(),
                        reason: e.to_string(),
                    },
                )?;
                Ok(PhraseRule {
                    literal: literal.clone(),
                    lowered: literal.to_lowercase(),
                    strip,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let claims = rules
            .banned_claim_patterns
            .iter()
            .map(|source| {
                let regex = Regex::new(source).map_err(|e| EngineError::ClaimPattern {
                    pattern: source.clone(),
                    reason: e.to_string(),
                })?;
                Ok(ClaimRule {
                    source: source.clone(),
                    regex,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let triggers = rules
            .disclaimer_rules
            .must_include_disclaimer_if_keywords
            .iter()
            .map(|kw| (kw.clone(), kw.to_lowercase()))
            .collect();

        Ok(Self {
            phrases,
            claims,
            always_disclaimer: rules.disclaimer_rules.always_include_default_disclaimer,
            triggers,
        })
    }
}
