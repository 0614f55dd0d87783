//! Selective disclosure and verification of requests.
//!
//! Redaction never touches the root hash or the claimer signature: a hidden
//! property keeps its leaf hash with the nonce erased, so the root stays
//! recomputable from what is left.

use didproof_core::parse_did_url;
use didproof_did::{verify_did_signature, DidDetails, KeyRelationship};
use tracing::debug;

use crate::error::{CredentialError, Result};
use crate::request::{ctype_value, RequestForAttestation};

impl RequestForAttestation {
    /// A copy with the claim owner removed and its commitment hidden.
    pub fn hide_owner(&self) -> Self {
        let mut redacted = self.clone();
        redacted.claim.owner = None;
        redacted.claim_owner = redacted.claim_owner.hidden();
        redacted
    }

    /// A copy with the named properties removed from the claim and their
    /// leaves hidden. Unknown names are ignored.
    pub fn hide_properties<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut redacted = self.clone();
        for name in names {
            let name = name.as_ref();
            redacted.claim.contents.remove(name);
            if let Some(leaf) = redacted.claim_hash_tree.get_mut(name) {
                *leaf = leaf.hidden();
            }
        }
        redacted
    }

    /// Recompute every disclosed commitment and the root hash.
    ///
    /// Hidden leaves contribute their stored hash unchanged. Legitimations
    /// are not descended into.
    pub fn verify_integrity(&self) -> Result<()> {
        for (name, value) in &self.claim.contents {
            let disclosed = match self.claim_hash_tree.get(name) {
                Some(leaf) => leaf.matches(value)?,
                None => false,
            };
            if !disclosed {
                return Err(CredentialError::Integrity {
                    property: name.clone(),
                });
            }
        }

        if let Some(owner) = &self.claim.owner {
            if !self.claim_owner.matches(&serde_json::Value::from(owner.as_str()))? {
                return Err(CredentialError::Integrity {
                    property: "claimOwner".into(),
                });
            }
        }

        if self.ctype_hash.is_disclosed()
            && !self.ctype_hash.matches(&ctype_value(&self.claim.ctype_hash))?
        {
            return Err(CredentialError::Integrity {
                property: "cTypeHash".into(),
            });
        }

        let computed = self.compute_root_hash();
        if computed != self.root_hash {
            return Err(CredentialError::RootHashMismatch {
                stored: self.root_hash,
                computed,
            });
        }
        Ok(())
    }

    /// Structural validation without hashing.
    pub fn check_shape(&self) -> Result<()> {
        if let Some(owner) = &self.claim.owner {
            parse_did_url(owner).map_err(|e| CredentialError::schema("claim.owner", e.to_string()))?;
        }

        if let Some(name) = self
            .claim
            .contents
            .keys()
            .find(|name| !self.claim_hash_tree.contains_key(*name))
        {
            return Err(CredentialError::schema(
                format!("claimHashTree.{}", name),
                "no commitment for disclosed property",
            ));
        }

        let key_id = parse_did_url(&self.claimer_signature.key_id).map_err(|e| {
            CredentialError::schema("claimerSignature.keyId", e.to_string())
        })?;
        if key_id.fragment.is_none() {
            return Err(CredentialError::schema(
                "claimerSignature.keyId",
                "missing key fragment",
            ));
        }
        match self.claimer_signature.signature_bytes() {
            Ok(bytes) if !bytes.is_empty() => {}
            _ => {
                return Err(CredentialError::schema(
                    "claimerSignature.signature",
                    "not a hex-encoded signature",
                ))
            }
        }

        for (i, legitimation) in self.legitimations.iter().enumerate() {
            parse_did_url(&legitimation.attestation.owner).map_err(|e| {
                CredentialError::schema(format!("legitimations[{}].attestation.owner", i), e.to_string())
            })?;
        }
        Ok(())
    }

    /// Parse a JSON request and check its shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let request: Self = serde_json::from_value(value)
            .map_err(|e| CredentialError::schema("requestForAttestation", e.to_string()))?;
        request.check_shape()?;
        Ok(request)
    }

    /// Check the claimer signature over the root hash against the
    /// authentication keys of `claimer`.
    pub fn verify_signature(&self, claimer: &dyn DidDetails) -> Result<bool> {
        let signature = self.claimer_signature.signature_bytes().map_err(|_| {
            CredentialError::schema("claimerSignature.signature", "not hex")
        })?;
        let result = verify_did_signature(
            self.root_hash.as_bytes(),
            &signature,
            &self.claimer_signature.key_id,
            Some(KeyRelationship::Authentication),
            claimer,
        );
        if !result.verified {
            debug!(
                key_id = %self.claimer_signature.key_id,
                "claimer signature did not verify"
            );
        }
        Ok(result.verified)
    }
}
