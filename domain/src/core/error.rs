//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}

impl DomainError {
    /// Check if this error came from the wire rather than from local input
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, DomainError::MalformedFrame(_))
    }
}
