//! End-to-end credential verification.
//!
//! A request verifies when its shape is sound, every disclosed commitment
//! and the root hash recompute, and the claimer signature checks out against
//! the claimer's resolved DID document. Legitimations are verified the same
//! way, each also bound to its attestation.

use didproof_credential::{Attestation, AttestedClaim, RequestForAttestation};
use didproof_did::{verify_did_signature_async, DidResolver, KeyRelationship};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Configuration for the verifier.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Whether legitimations are verified along with the request.
    pub verify_legitimations: bool,
    /// Maximum nesting depth of legitimations.
    pub max_legitimation_depth: usize,
    /// Whether a revoked attestation makes a credential invalid.
    pub reject_revoked: bool,
    /// Role the claimer signing key must hold, `None` for any key.
    pub claimer_key_relationship: Option<KeyRelationship>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            verify_legitimations: true,
            max_legitimation_depth: 8,
            reject_revoked: true,
            claimer_key_relationship: Some(KeyRelationship::Authentication),
        }
    }
}

/// Verifies requests and credentials, resolving claimer DIDs on demand.
///
/// Hard failures (malformed shape, broken commitments, attestation bound to
/// another request) are errors. A signature that does not verify, an
/// unknown claimer DID or a revoked attestation yields `Ok(false)`.
pub struct CredentialVerifier<R: DidResolver> {
    resolver: R,
    config: VerifierConfig,
}

impl<R: DidResolver> CredentialVerifier<R> {
    pub fn new(resolver: R, config: VerifierConfig) -> Self {
        Self { resolver, config }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify a request for attestation.
    pub async fn verify_request(&self, request: &RequestForAttestation) -> Result<bool> {
        self.verify_tree(request, None).await
    }

    /// Verify a credential: attestation binding and revocation, then the
    /// request.
    pub async fn verify_attested_claim(&self, credential: &AttestedClaim) -> Result<bool> {
        self.verify_tree(&credential.request, Some(&credential.attestation))
            .await
    }

    async fn verify_tree<'a>(
        &self,
        root: &'a RequestForAttestation,
        attestation: Option<&'a Attestation>,
    ) -> Result<bool> {
        let mut pending = vec![(root, attestation, 0usize)];

        while let Some((request, attestation, depth)) = pending.pop() {
            if let Some(attestation) = attestation {
                if !self.check_attestation(request, attestation)? {
                    return Ok(false);
                }
            }

            if !self.verify_single(request).await? {
                return Ok(false);
            }

            if self.config.verify_legitimations && !request.legitimations.is_empty() {
                if depth >= self.config.max_legitimation_depth {
                    return Err(Error::LegitimationDepthExceeded {
                        max_depth: self.config.max_legitimation_depth,
                    });
                }
                for legitimation in request.legitimations.iter().rev() {
                    pending.push((
                        &legitimation.request,
                        Some(&legitimation.attestation),
                        depth + 1,
                    ));
                }
            }
        }
        Ok(true)
    }

    fn check_attestation(
        &self,
        request: &RequestForAttestation,
        attestation: &Attestation,
    ) -> Result<bool> {
        if attestation.revoked && self.config.reject_revoked {
            warn!(
                claim_hash = %attestation.claim_hash,
                attester = %attestation.owner,
                "attestation is revoked"
            );
            return Ok(false);
        }
        attestation.check_binding(request)?;
        Ok(true)
    }

    async fn verify_single(&self, request: &RequestForAttestation) -> Result<bool> {
        request.check_shape()?;
        request.verify_integrity()?;

        let signature = request.claimer_signature.signature_bytes()?;
        let result = verify_did_signature_async(
            request.root_hash.as_bytes(),
            &signature,
            &request.claimer_signature.key_id,
            self.config.claimer_key_relationship,
            None,
            &self.resolver,
        )
        .await?;

        if !result.verified {
            debug!(
                root_hash = %request.root_hash,
                key_id = %request.claimer_signature.key_id,
                "claimer signature rejected"
            );
        }
        Ok(result.verified)
    }
}
