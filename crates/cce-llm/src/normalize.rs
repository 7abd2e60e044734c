//! Boundary adapter: loose backend fields → strict draft fields
//!
//! All normalization of backend output happens here, immediately after
//! the backend call. Downstream code (drafts, review, export) only ever
//! sees the strict [`DraftFields`] record.

use crate::types::{RawFields, StringOrList};

/// Maximum hashtags kept on any record.
pub const MAX_HASHTAGS: usize = 10;

/// Strictly-typed content fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftFields {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub cta: String,
    pub disclaimer: String,
    pub reel_script: Vec<String>,
}

/// Parse a backend reply as a JSON object of loose fields.
///
/// A malformed reply (not a JSON object, or fields of unusable shape)
/// degrades to a minimal record carrying the raw text as `caption` with
/// every other field absent; the caller's defaults fill the rest.
/// Backend formatting mistakes must never fail the pipeline.
#[must_use]
pub fn parse_backend_json(raw: &str) -> RawFields {
    match serde_json::from_str::<RawFields>(raw) {
        Ok(fields) => fields,
        Err(_) => RawFields {
            caption: Some(raw.to_string()),
            ..RawFields::default()
        },
    }
}

/// Normalize loose fields into a strict record.
///
/// Absent fields fall back to the corresponding `fallback` value. A
/// hashtag string splits on whitespace and drops tokens that do not
/// start with `#`; a reel-script string splits on line breaks keeping
/// non-empty trimmed lines in order. Hashtags are capped at
/// [`MAX_HASHTAGS`].
#[must_use]
pub fn normalize_fields(raw: RawFields, fallback: &DraftFields) -> DraftFields {
    let caption = raw.caption.unwrap_or_else(|| fallback.caption.clone());

    let mut hashtags = match raw.hashtags {
        Some(StringOrList::Text(s)) => s
            .split_whitespace()
            .filter(|tag| tag.starts_with('#'))
            .map(ToString::to_string)
            .collect(),
        Some(StringOrList::List(tags)) => tags,
        None => fallback.hashtags.clone(),
    };
    hashtags.truncate(MAX_HASHTAGS);

    let cta = raw.soft_cta.unwrap_or_else(|| fallback.cta.clone());
    let disclaimer = raw
        .disclaimer
        .unwrap_or_else(|| fallback.disclaimer.clone());

    let reel_script = match raw.reel_script {
        Some(StringOrList::Text(s)) => s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect(),
        Some(StringOrList::List(lines)) => lines,
        None => fallback.reel_script.clone(),
    };

    DraftFields {
        caption,
        hashtags,
        cta,
        disclaimer,
        reel_script,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> DraftFields {
        DraftFields {
            caption: "original caption".to_string(),
            hashtags: vec!["#orig".to_string()],
            cta: "Book a consult".to_string(),
            disclaimer: "Educational information only.".to_string(),
            reel_script: vec!["line".to_string()],
        }
    }

    #[test]
    fn object_reply_parses_fields() {
        let raw = parse_backend_json(
            r##"{"caption": "c", "hashtags": ["#a", "#b"], "soft_cta": "do it"}"##,
        );
        assert_eq!(raw.caption.as_deref(), Some("c"));
        assert_eq!(raw.soft_cta.as_deref(), Some("do it"));
    }

    #[test]
    fn cta_alias_is_accepted() {
        let raw = parse_backend_json(r#"{"cta": "Send us a message"}"#);
        assert_eq!(raw.soft_cta.as_deref(), Some("Send us a message"));
    }

    #[test]
    fn non_object_reply_becomes_caption() {
        let raw = parse_backend_json("Sorry, I cannot produce JSON today.");
        assert_eq!(
            raw.caption.as_deref(),
            Some("Sorry, I cannot produce JSON today.")
        );
        assert!(raw.hashtags.is_none());
        assert!(raw.disclaimer.is_none());
    }

    #[test]
    fn hashtag_string_splits_and_filters() {
        let raw = parse_backend_json(r##"{"hashtags": "#one two #three"}"##);
        let fields = normalize_fields(raw, &fallback());
        assert_eq!(fields.hashtags, vec!["#one", "#three"]);
    }

    #[test]
    fn hashtags_are_capped_at_ten() {
        let tags: Vec<String> = (0..15).map(|i| format!("#t{i}")).collect();
        let raw = RawFields {
            hashtags: Some(crate::types::StringOrList::List(tags)),
            ..RawFields::default()
        };
        let fields = normalize_fields(raw, &fallback());
        assert_eq!(fields.hashtags.len(), 10);
    }

    #[test]
    fn reel_script_string_splits_into_trimmed_lines() {
        let raw = parse_backend_json("{\"reel_script\": \"Hook \\n\\n  Point 1\\nCTA\"}");
        let fields = normalize_fields(raw, &fallback());
        assert_eq!(fields.reel_script, vec!["Hook", "Point 1", "CTA"]);
    }

    #[test]
    fn absent_fields_use_fallback() {
        let fields = normalize_fields(RawFields::default(), &fallback());
        assert_eq!(fields, fallback());
    }
}
