//! Attestations and attested claims.

use didproof_core::Blake3Hash;
use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, Result};
use crate::request::RequestForAttestation;

/// An attester's endorsement of a request's root hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    /// Root hash of the attested request.
    pub claim_hash: Blake3Hash,
    #[serde(rename = "cTypeHash")]
    pub ctype_hash: Blake3Hash,
    /// Attester DID.
    pub owner: String,
    pub revoked: bool,
    #[serde(default)]
    pub delegation_id: Option<Blake3Hash>,
}

impl Attestation {
    /// Attest `request` as `attester`.
    pub fn from_request(request: &RequestForAttestation, attester: impl Into<String>) -> Self {
        Self {
            claim_hash: request.root_hash,
            ctype_hash: request.claim.ctype_hash,
            owner: attester.into(),
            revoked: false,
            delegation_id: request.delegation_id,
        }
    }

    /// Check that this attestation endorses `request`: same root hash and
    /// claim type.
    pub fn check_binding(&self, request: &RequestForAttestation) -> Result<()> {
        if self.claim_hash != request.root_hash {
            return Err(CredentialError::AttestationMismatch(format!(
                "attested claim hash {} differs from root hash {}",
                self.claim_hash, request.root_hash
            )));
        }
        if self.ctype_hash != request.claim.ctype_hash {
            return Err(CredentialError::AttestationMismatch(format!(
                "attested claim type {} differs from claim type {}",
                self.ctype_hash, request.claim.ctype_hash
            )));
        }
        Ok(())
    }
}

/// A request together with its attestation; a credential.
///
/// Attested claims can be attached to new requests as legitimations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestedClaim {
    pub request: RequestForAttestation,
    pub attestation: Attestation,
}

impl AttestedClaim {
    pub fn from_request_and_attestation(
        request: RequestForAttestation,
        attestation: Attestation,
    ) -> Self {
        Self {
            request,
            attestation,
        }
    }

    /// Check that the attestation belongs to the request.
    pub fn check_binding(&self) -> Result<()> {
        self.attestation.check_binding(&self.request)
    }

    /// Request integrity plus attestation binding.
    pub fn verify_data(&self) -> Result<()> {
        self.request.verify_integrity()?;
        self.check_binding()
    }

    /// A copy with `hidden_properties` (and optionally the owner) redacted.
    pub fn create_presentation<I, S>(&self, hidden_properties: I, hide_owner: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut request = self.request.hide_properties(hidden_properties);
        if hide_owner {
            request = request.hide_owner();
        }
        Self {
            request,
            attestation: self.attestation.clone(),
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.attestation.revoked
    }
}
