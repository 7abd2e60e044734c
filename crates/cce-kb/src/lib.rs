//! Knowledge base: chunk store builder and lexical retriever
//!
//! Source documents are split into overlapping fixed-size chunks with
//! stable ids; retrieval ranks chunks against a query by token-set
//! overlap. Relevance is purely lexical; there is no embedding model
//! anywhere in this crate.

mod chunker;
mod retrieval;

pub use chunker::{ChunkParams, chunk_id, chunk_text};
pub use retrieval::{retrieve, score_chunk, tokenize};

use serde::{Deserialize, Serialize};

/// A bounded slice of a source document, the unit of retrieval.
///
/// Created once by ingestion and immutable afterwards. `chunk_id` is
/// `{file-stem}-{zero-padded index}`, so re-ingesting an unchanged file
/// reproduces identical ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceChunk {
    pub source_file: String,
    pub chunk_id: String,
    pub text: String,
}
