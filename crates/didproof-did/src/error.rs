//! Error types for the DID document model.

use didproof_core::CoreError;
use thiserror::Error;

use crate::key::KeyType;

/// Errors that can occur while building or using a DID document.
#[derive(Debug, Error)]
pub enum DidError {
    /// The document violates a construction invariant.
    #[error("invalid DID configuration: {0}")]
    Configuration(String),

    /// No key with the given id exists on the document.
    #[error("key {key_id} not found on {did}")]
    KeyNotFound { did: String, key_id: String },

    /// The key's type has no signature scheme.
    #[error("no signature algorithm for key type {0}")]
    UnsupportedKeyType(KeyType),

    /// The injected signer failed.
    #[error("signing failed: {0}")]
    SigningFailure(String),

    /// The injected resolver failed.
    #[error("resolution failed: {0}")]
    ResolutionFailure(String),

    /// Malformed primitive (DID string, hex, length).
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for DID operations.
pub type Result<T> = std::result::Result<T, DidError>;
