//! Error types for model transport.

use thiserror::Error;

/// Errors surfaced by LLM providers.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure reaching the provider.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Credentials rejected by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Provider throttled the request.
    #[error("rate limited: {0}")]
    RateLimited(String),
    /// Provider returned a non-success status.
    #[error("provider error (status={status}): {message}")]
    Provider { status: u16, message: String },
    /// Request exceeded the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),
    /// Response arrived without usable content.
    #[error("empty response from provider")]
    EmptyResponse,
    /// Provider configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
}
