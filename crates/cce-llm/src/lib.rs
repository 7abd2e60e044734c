//! Generation backend abstraction
//!
//! This crate provides a trait-based system for producing structured
//! social content fields. Two implementations exist: a live HTTP backend
//! (OpenAI-compatible chat completions) and a deterministic stub that
//! synthesizes plausible content from local inputs without any external
//! call, keeping the pipeline runnable end-to-end with zero external
//! dependencies.
//!
//! Backend availability is resolved once per run by [`backend_from_env`]
//! and threaded through the pipeline as a constructed value; downstream
//! stages branch on [`GenerationBackend::mode`] rather than re-reading
//! the environment.

mod http_client;
mod normalize;
mod openai_backend;
mod stub_backend;
mod types;

pub use normalize::{DraftFields, normalize_fields, parse_backend_json};
pub use openai_backend::{API_KEY_ENV, OpenAiBackend};
pub use stub_backend::StubBackend;
pub use types::{
    BackendMode, GenerationBackend, GenerationError, GenerationRequest, Grounding, RawFields,
    StringOrList,
};

/// Resolve the backend mode from the credential environment variable.
///
/// Live when `OPENAI_API_KEY` is present and non-blank, stub otherwise.
#[must_use]
pub fn mode_from_env() -> BackendMode {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => BackendMode::Live,
        _ => BackendMode::Stub,
    }
}

/// Construct the generation backend for this run.
///
/// The live backend is selected when the `OPENAI_API_KEY` credential is
/// present and non-empty; otherwise the deterministic stub is used. The
/// decision is made exactly once per CLI invocation so generation and
/// review always agree on the mode.
///
/// # Errors
///
/// Returns `GenerationError::Misconfiguration` if the credential is
/// present but the HTTP client cannot be constructed.
pub fn backend_from_env() -> Result<Box<dyn GenerationBackend>, GenerationError> {
    match mode_from_env() {
        BackendMode::Live => Ok(Box::new(OpenAiBackend::from_env()?)),
        BackendMode::Stub => Ok(Box::new(StubBackend::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // Single lock for tests that touch environment variables.
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    #[test]
    fn missing_credential_selects_stub() {
        let _guard = env_guard();

        // SAFETY: test-scoped env mutation, serialized by ENV_LOCK.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }

        let backend = backend_from_env().unwrap();
        assert_eq!(backend.mode(), BackendMode::Stub);
    }

    #[test]
    fn blank_credential_selects_stub() {
        let _guard = env_guard();

        // SAFETY: test-scoped env mutation, serialized by ENV_LOCK.
        unsafe {
            std::env::set_var(API_KEY_ENV, "   ");
        }

        let backend = backend_from_env().unwrap();
        assert_eq!(backend.mode(), BackendMode::Stub);

        // SAFETY: cleaning up the variable we set above.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
    }

    #[test]
    fn present_credential_selects_live() {
        let _guard = env_guard();

        // SAFETY: test-scoped env mutation, serialized by ENV_LOCK.
        unsafe {
            std::env::set_var(API_KEY_ENV, "test-key-for-factory");
        }

        let backend = backend_from_env().unwrap();
        assert_eq!(backend.mode(), BackendMode::Live);

        // SAFETY: cleaning up the variable we set above.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
    }
}
