//! Core types for the generation backend abstraction

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use cce_utils::EngineError;

/// Which backend variant a run is using.
///
/// Resolved once per run; generation and review read the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// External generative service is available
    Live,
    /// Deterministic local synthesis, no external calls
    Stub,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Stub => write!(f, "stub"),
        }
    }
}

/// Local inputs the stub synthesizes from.
///
/// The live backend ignores this; the stub ignores the prompt pair. Both
/// are carried on every request so the two variants stay interchangeable
/// behind one trait.
#[derive(Debug, Clone)]
pub struct Grounding {
    pub client_name: String,
    pub service: String,
    pub angle: String,
    pub cta: String,
    pub disclaimer: String,
    /// Texts of the retrieved grounding chunks, in retrieval order.
    pub chunk_excerpts: Vec<String>,
}

/// Input to a generation backend invocation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System instruction for the live backend
    pub system: String,
    /// User context string for the live backend
    pub user: String,
    /// Local inputs for the stub
    pub grounding: Grounding,
}

/// A backend response field that may arrive as a single string or a
/// sequence of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    Text(String),
    List(Vec<String>),
}

/// Loosely-typed fields as returned by a backend.
///
/// Every field is optional and `hashtags`/`reel_script` may be either a
/// string or a list; [`normalize_fields`](crate::normalize_fields)
/// converts this into the strict internal record immediately after the
/// backend call so the ambiguity never propagates further.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Option<StringOrList>,
    #[serde(default, alias = "cta")]
    pub soft_cta: Option<String>,
    #[serde(default)]
    pub disclaimer: Option<String>,
    #[serde(default)]
    pub reel_script: Option<StringOrList>,
}

/// Errors from the generation backend boundary.
///
/// Malformed response *content* is never an error (the live backend
/// substitutes a fallback record); these cover construction and
/// transport failures only.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Backend construction failed (bad credential setup, client build)
    #[error("Backend misconfiguration: {0}")]
    Misconfiguration(String),

    /// Network-level failure after the retry budget was exhausted
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider returned a non-retryable HTTP error
    #[error("Provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The invocation timed out on every attempt
    #[error("Backend request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl From<GenerationError> for EngineError {
    fn from(err: GenerationError) -> Self {
        EngineError::Generation(err.to_string())
    }
}

/// Trait for generation backend implementations.
///
/// Both variants (live HTTP and deterministic stub) implement this,
/// allowing the draft synthesizer and the review orchestrator to work
/// with either without knowing which is active.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Which variant this backend is; stable for the life of the run.
    fn mode(&self) -> BackendMode;

    /// Produce content fields for the given request.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` for transport or provider failures.
    /// The stub variant never fails.
    async fn generate(&self, req: &GenerationRequest) -> Result<RawFields, GenerationError>;
}
