//! Error types for credential handling.

use didproof_core::{Blake3Hash, CoreError};
use didproof_did::DidError;
use thiserror::Error;

/// Errors that can occur while building, checking or encoding credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Structural shape violation.
    #[error("schema violation at {field}: {reason}")]
    Schema { field: String, reason: String },

    /// A disclosed value does not match its salted commitment.
    #[error("integrity check failed for {property}")]
    Integrity { property: String },

    /// The recomputed root hash differs from the stored one.
    #[error("root hash mismatch: stored {stored}, computed {computed}")]
    RootHashMismatch {
        stored: Blake3Hash,
        computed: Blake3Hash,
    },

    /// Malformed compressed sequence.
    #[error("malformed compressed form: {0}")]
    Format(String),

    /// Compression requires every commitment to still carry its nonce.
    #[error("cannot compress: {field} is redacted")]
    Redacted { field: String },

    /// An attestation does not belong to the request it is paired with.
    #[error("attestation mismatch: {0}")]
    AttestationMismatch(String),

    /// DID document or signer error.
    #[error("DID error: {0}")]
    Did(#[from] DidError),

    /// Hashing or encoding error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CredentialError {
    pub(crate) fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, CredentialError>;
