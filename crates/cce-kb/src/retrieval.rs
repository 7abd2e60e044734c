//! Lexical top-k retrieval by token-set overlap
//!
//! Tokenization lower-cases and extracts maximal `[a-z0-9_]` runs, then
//! dedupes into a set. A chunk's score is the size of the intersection
//! between its token set and the query's. Scoring is intentionally
//! simple: no tf-idf, no stemming, no embeddings.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::SourceChunk;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9_]+").expect("static regex"));

/// Deduplicated token set of `text`.
#[must_use]
pub fn tokenize(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Number of query terms that appear in `text`.
#[must_use]
pub fn score_chunk(query_terms: &HashSet<String>, text: &str) -> usize {
    let words = tokenize(text);
    query_terms.intersection(&words).count()
}

/// Rank `chunks` against `query` and return up to `top_k` of them.
///
/// Zero-score chunks are excluded; the rest are sorted by score
/// descending with a stable sort, so equal-score chunks keep their
/// corpus order. If nothing scores above zero the first `top_k` corpus
/// chunks are returned in original order; callers must not treat an
/// all-zero result as "no grounding."
#[must_use]
pub fn retrieve<'a>(query: &str, chunks: &'a [SourceChunk], top_k: usize) -> Vec<&'a SourceChunk> {
    let terms = tokenize(query);

    let mut scored: Vec<(usize, &SourceChunk)> = chunks
        .iter()
        .filter_map(|chunk| {
            let score = score_chunk(&terms, &chunk.text);
            (score > 0).then_some((score, chunk))
        })
        .collect();

    // Stable sort: equal scores preserve corpus order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    debug!(
        query_terms = terms.len(),
        matched = scored.len(),
        top_k,
        "retrieval scored corpus"
    );

    if scored.is_empty() {
        return chunks.iter().take(top_k).collect();
    }
    scored.into_iter().take(top_k).map(|(_, c)| c).collect()
}
