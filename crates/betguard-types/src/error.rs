//! Error types for the BetGuard action gate.
//!
//! Errors are reserved for caller programming mistakes. An action that is
//! turned away by the gate is a [`DenialReason`](crate::DenialReason), not
//! an error.
//!
//! All errors use the `BG_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Request / input errors
//! - 2xx: Action history errors
//! - 9xx: Configuration / general errors

use thiserror::Error;

/// Central error enum for all BetGuard operations.
#[derive(Debug, Error)]
pub enum BetguardError {
    // =================================================================
    // Request Errors (1xx)
    // =================================================================
    /// The identity string was empty or whitespace.
    #[error("BG_ERR_100: Identity must not be empty")]
    EmptyIdentity,

    /// The identity contained characters that are never valid in an address.
    #[error("BG_ERR_101: Invalid identity: {reason}")]
    InvalidIdentity { reason: String },

    /// The nonce string was empty.
    #[error("BG_ERR_102: Nonce must not be empty")]
    EmptyNonce,

    /// The session token was not the expected lowercase hex string.
    #[error("BG_ERR_103: Invalid session id: {reason}")]
    InvalidSessionId { reason: String },

    // =================================================================
    // History Errors (2xx)
    // =================================================================
    /// A recent-action timestamp went backwards.
    #[error("BG_ERR_200: Action history not monotonic: {previous} followed by {next}")]
    NonMonotonicHistory { previous: u64, next: u64 },

    /// A history's capacity or length is out of bounds.
    #[error("BG_ERR_201: Invalid action history: {reason}")]
    InvalidHistory { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("BG_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("BG_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (zero limits, unreachable heuristics, etc.).
    #[error("BG_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BetguardError>;

impl From<serde_json::Error> for BetguardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
