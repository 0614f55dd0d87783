//! Error types for the didproof facade.

use didproof_core::CoreError;
use didproof_credential::CredentialError;
use didproof_did::DidError;
use thiserror::Error;

/// Errors that can occur during credential verification.
#[derive(Debug, Error)]
pub enum Error {
    /// Primitive error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// DID document, signer or resolver error.
    #[error("DID error: {0}")]
    Did(#[from] DidError),

    /// Shape, integrity or encoding error.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Legitimations are nested deeper than the configured limit.
    #[error("legitimations nested deeper than {max_depth}")]
    LegitimationDepthExceeded { max_depth: usize },
}

/// Result type for didproof operations.
pub type Result<T> = std::result::Result<T, Error>;
