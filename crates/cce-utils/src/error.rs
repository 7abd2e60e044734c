//! Library-level error type for the content pipeline
//!
//! `EngineError` is the primary error type returned by cce library
//! operations. Variants are grouped by how the CLI reacts to them:
//!
//! | Category | Variants | Exit code |
//! |----------|----------|-----------|
//! | Configuration | `MissingConfig`, `ConfigParse`, `InvalidMonth`, `ChunkOverlap`, `ClaimPattern`, `Config` | 2 |
//! | Precondition | `MissingSources`, `MissingArtifact`, `EmptyArtifact` | 1 |
//! | Everything else | `Io`, `Malformed`, `Generation` | 1 |
//!
//! Compliance violations are NOT errors; they flow through the review
//! stage's FAIL/FIXED statuses and never surface here.

use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Errors produced by the content pipeline.
///
/// Library code returns `EngineError` and does NOT call
/// `std::process::exit()`; the CLI maps errors to exit codes via
/// [`to_exit_code()`](Self::to_exit_code).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The client sources directory does not exist.
    #[error("Missing sources directory: {}", .path.display())]
    MissingSources { path: PathBuf },

    /// A required predecessor artifact does not exist on disk.
    #[error("Missing {what}. Run `{predecessor}` first: {}", .path.display())]
    MissingArtifact {
        what: &'static str,
        predecessor: &'static str,
        path: PathBuf,
    },

    /// A prerequisite artifact exists but contains zero items.
    #[error("No {what} found in {}", .path.display())]
    EmptyArtifact { what: &'static str, path: PathBuf },

    /// A required config file does not exist.
    #[error("Missing config file: {}", .path.display())]
    MissingConfig { path: PathBuf },

    /// A config file exists but could not be parsed.
    #[error("Invalid config in {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// Month token did not parse as `YYYY-MM`.
    #[error("Invalid month '{month}': expected YYYY-MM")]
    InvalidMonth { month: String },

    /// Chunking parameters violate the `overlap < size` constraint.
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    ChunkOverlap { size: usize, overlap: usize },

    /// A banned-claim pattern in the guardrail profile is not a valid regex.
    #[error("Invalid claim pattern '{pattern}': {reason}")]
    ClaimPattern { pattern: String, reason: String },

    /// Catch-all configuration error with a descriptive message.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted artifact could not be decoded.
    #[error("Malformed artifact {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Generation backend failure (transport, provider, timeout).
    #[error("Generation backend error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Map this error to the CLI exit code table.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::MissingConfig { .. }
            | Self::ConfigParse { .. }
            | Self::InvalidMonth { .. }
            | Self::ChunkOverlap { .. }
            | Self::ClaimPattern { .. }
            | Self::Config(_) => ExitCode::ConfigError,
            _ => ExitCode::Failure,
        }
    }
}
