//! Fixed-size overlapping chunker
//!
//! Chunks are measured in characters, not bytes, so multi-byte text never
//! splits a code point. Consecutive chunks overlap by exactly
//! `params.overlap` characters (except the final, possibly shorter,
//! chunk), and every character of the input is covered by at least one
//! chunk.

use cce_utils::EngineError;
use tracing::debug;

/// Chunking parameters: fixed chunk size with overlap.
///
/// `overlap < size` is a hard constraint, checked before any chunk is
/// produced.
#[derive(Debug, Clone, Copy)]
pub struct ChunkParams {
    /// Chunk size in characters
    pub size: usize,
    /// Overlap between consecutive chunks in characters
    pub overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            size: 1000,
            overlap: 100,
        }
    }
}

/// Deterministic chunk id: `{file-stem}-{zero-padded index}`.
#[must_use]
pub fn chunk_id(stem: &str, index: usize) -> String {
    format!("{stem}-{index:04}")
}

/// Split `text` into overlapping chunks.
///
/// Starting at offset 0, each chunk is `text[start..start + size]`
/// (clamped to the end); `start` advances by `size - overlap` until it
/// passes the end of the text. Empty slices are never emitted.
///
/// # Errors
///
/// Returns `EngineError::ChunkOverlap` when `overlap >= size`.
pub fn chunk_text(text: &str, params: &ChunkParams) -> Result<Vec<String>, EngineError> {
    if params.overlap >= params.size {
        return Err(EngineError::ChunkOverlap {
            size: params.size,
            overlap: params.overlap,
        });
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }

    let step = params.size - params.overlap;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + params.size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }

    debug!(
        input_chars = chars.len(),
        chunk_count = chunks.len(),
        size = params.size,
        overlap = params.overlap,
        "chunked text"
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(size: usize, overlap: usize) -> ChunkParams {
        ChunkParams { size, overlap }
    }

    #[test]
    fn overlap_must_be_smaller_than_size() {
        let err = chunk_text("abc", &params(10, 10)).unwrap_err();
        assert!(matches!(err, EngineError::ChunkOverlap { .. }));
        assert!(chunk_text("abc", &params(10, 11)).is_err());
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", &ChunkParams::default()).unwrap().is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("hello", &ChunkParams::default()).unwrap();
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn consecutive_chunks_share_exactly_overlap_chars() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunk_text(text, &params(10, 3)).unwrap();
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let next: Vec<char> = pair[1].chars().collect();
            let tail: String = prev[prev.len() - 3..].iter().collect();
            let head: String = next[..3].iter().collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn rechunking_is_deterministic() {
        let text = "the quick brown fox jumps over the lazy dog".repeat(20);
        let a = chunk_text(&text, &params(100, 25)).unwrap();
        let b = chunk_text(&text, &params(100, 25)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn multibyte_text_never_splits_a_code_point() {
        let text = "héllo wörld ünïcode tèxt".repeat(10);
        let chunks = chunk_text(&text, &params(7, 2)).unwrap();
        // Reaching here without a panic means no char boundary was broken;
        // also check full coverage by character count.
        let step = 5;
        let covered = step * (chunks.len() - 1) + chunks.last().unwrap().chars().count();
        assert_eq!(covered, text.chars().count());
    }

    #[test]
    fn chunk_ids_are_zero_padded() {
        assert_eq!(chunk_id("faq", 0), "faq-0000");
        assert_eq!(chunk_id("faq", 42), "faq-0042");
    }

    proptest! {
        /// Every character offset is covered by at least one chunk, and
        /// concatenating the non-overlapping prefixes reconstructs the input.
        #[test]
        fn chunks_cover_every_offset(
            text in "\\PC{0,400}",
            size in 2usize..64,
            overlap in 0usize..32,
        ) {
            prop_assume!(overlap < size);
            let params = ChunkParams { size, overlap };
            let chunks = chunk_text(&text, &params).unwrap();
            let total_chars = text.chars().count();

            if total_chars == 0 {
                prop_assert!(chunks.is_empty());
                return Ok(());
            }

            prop_assert!(chunks.iter().all(|c| !c.is_empty()));

            // Walk chunk start offsets; the union of [start, start+len)
            // ranges must cover [0, total_chars) without gaps.
            let step = size - overlap;
            let mut covered_to = 0usize;
            for (i, chunk) in chunks.iter().enumerate() {
                let start = i * step;
                prop_assert!(start <= covered_to, "gap before chunk {}", i);
                covered_to = covered_to.max(start + chunk.chars().count());
            }
            prop_assert_eq!(covered_to, total_chars);
        }
    }
}
