//! Error types for the core workflow crate.

use maitre_rs_protocol::SessionId;
use thiserror::Error;

/// Errors returned by session and assistant operations.
#[derive(Debug, Error)]
pub enum MaitreCoreError {
    /// Session id is unknown to the assistant.
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Data parsing error.
    #[error("parse error: {0}")]
    Parse(String),
}
