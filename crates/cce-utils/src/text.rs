//! Text normalization helpers

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Collapse all whitespace runs to a single space and trim both ends.
///
/// Applied to source documents before chunking and to captions after
/// guardrail stripping, so downstream consumers never see doubled spaces
/// or stray newlines.
#[must_use]
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(clean_text("  a \n\t b  \r\n c "), "a b c");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n  "), "");
    }
}
