//! Requests for attestation: the claimer's signed commitment to a claim.
//!
//! Building a request commits to every claim property under its own fresh
//! nonce, commits to the owner and the claim type the same way, folds the
//! commitments into a root hash and has the claimer sign it.
//!
//! ```text
//! root = Blake3(
//!     leaf hashes, sorted by property name
//!  || claimOwner.hash
//!  || cTypeHash.hash
//!  || legitimation claim hashes, in order
//!  || delegationId or 32 zero bytes
//! )
//! ```

use std::collections::BTreeMap;

use didproof_core::Blake3Hash;
use didproof_did::{DidDetails, DidSignature, KeystoreSigner};
use serde::{Deserialize, Serialize};

use crate::attestation::AttestedClaim;
use crate::claim::Claim;
use crate::error::{CredentialError, Result};
use crate::nonce_hash::NonceHash;

/// Property name -> salted commitment. Iteration order is sorted by name.
pub type ClaimHashTree = BTreeMap<String, NonceHash>;

/// A claimer-signed, selectively disclosable commitment to a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestForAttestation {
    pub claim: Claim,
    pub claim_hash_tree: ClaimHashTree,
    pub claim_owner: NonceHash,
    #[serde(rename = "cTypeHash")]
    pub ctype_hash: NonceHash,
    pub claimer_signature: DidSignature,
    pub root_hash: Blake3Hash,
    pub legitimations: Vec<AttestedClaim>,
    #[serde(default)]
    pub delegation_id: Option<Blake3Hash>,
}

impl RequestForAttestation {
    /// Commit to `claim` and sign the root hash with the claimer's first
    /// authentication key.
    pub async fn from_claim(
        claim: Claim,
        legitimations: Vec<AttestedClaim>,
        delegation_id: Option<Blake3Hash>,
        claimer: &dyn DidDetails,
        signer: &dyn KeystoreSigner,
    ) -> Result<Self> {
        let owner = claim
            .owner
            .as_deref()
            .ok_or_else(|| CredentialError::schema("claim.owner", "missing"))?;

        let claim_hash_tree = claim
            .contents
            .iter()
            .map(|(name, value)| Ok((name.clone(), NonceHash::commit(value)?)))
            .collect::<Result<ClaimHashTree>>()?;
        let claim_owner = NonceHash::commit(&serde_json::Value::from(owner))?;
        let ctype_hash = NonceHash::commit(&ctype_value(&claim.ctype_hash))?;

        let root_hash = compute_root_hash(
            &claim_hash_tree,
            &claim_owner,
            &ctype_hash,
            &legitimations,
            delegation_id.as_ref(),
        );

        let auth_key = claimer.authentication_key()?.id.clone();
        let claimer_signature = claimer
            .sign_payload(root_hash.as_bytes(), &auth_key, signer)
            .await?;

        Ok(Self {
            claim,
            claim_hash_tree,
            claim_owner,
            ctype_hash,
            claimer_signature,
            root_hash,
            legitimations,
            delegation_id,
        })
    }

    /// Recompute the root hash from the currently stored commitments.
    pub fn compute_root_hash(&self) -> Blake3Hash {
        compute_root_hash(
            &self.claim_hash_tree,
            &self.claim_owner,
            &self.ctype_hash,
            &self.legitimations,
            self.delegation_id.as_ref(),
        )
    }

    /// Names of properties whose value is still disclosed.
    pub fn disclosed_properties(&self) -> impl Iterator<Item = &str> {
        self.claim.contents.keys().map(String::as_str)
    }
}

/// The JSON value the claim-type commitment is taken over.
pub(crate) fn ctype_value(ctype_hash: &Blake3Hash) -> serde_json::Value {
    serde_json::Value::from(ctype_hash.to_hex())
}

pub(crate) fn compute_root_hash(
    tree: &ClaimHashTree,
    claim_owner: &NonceHash,
    ctype_hash: &NonceHash,
    legitimations: &[AttestedClaim],
    delegation_id: Option<&Blake3Hash>,
) -> Blake3Hash {
    let leaves = tree.values().map(|leaf| leaf.hash().as_bytes().as_slice());
    let legitimation_hashes = legitimations
        .iter()
        .map(|l| l.attestation.claim_hash.as_bytes().as_slice());
    let delegation = delegation_id.unwrap_or(&Blake3Hash::ZERO);

    Blake3Hash::hash_parts(
        leaves
            .chain([
                claim_owner.hash().as_bytes().as_slice(),
                ctype_hash.hash().as_bytes().as_slice(),
            ])
            .chain(legitimation_hashes)
            .chain([delegation.as_bytes().as_slice()]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use didproof_did::{KeyType, LightDidDetails, MemoryKeystore, NewLightDidKey};
    use serde_json::json;

    fn claimer(keystore: &MemoryKeystore) -> LightDidDetails {
        LightDidDetails::new(
            NewLightDidKey {
                key_type: KeyType::Ed25519,
                public_key: keystore.generate_ed25519(),
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_commits_every_property() {
        let keystore = MemoryKeystore::new();
        let did = claimer(&keystore);
        let claim = Claim::new(Blake3Hash::hash(b"ctype"), did.did())
            .with("name", json!("Alice"))
            .with("age", json!(29));

        let request = RequestForAttestation::from_claim(claim, vec![], None, &did, &keystore)
            .await
            .unwrap();

        assert_eq!(
            request.claim_hash_tree.keys().collect::<Vec<_>>(),
            vec!["age", "name"]
        );
        assert!(request.claim_hash_tree.values().all(NonceHash::is_disclosed));
        assert!(request.claim_hash_tree["name"]
            .matches(&json!("Alice"))
            .unwrap());
        assert!(request.claim_owner.matches(&json!(did.did())).unwrap());
        assert_eq!(request.compute_root_hash(), request.root_hash);
        assert_eq!(
            request.claimer_signature.key_id,
            did.assemble_key_id(LightDidDetails::AUTHENTICATION_KEY_ID)
        );
    }

    #[tokio::test]
    async fn test_root_hash_covers_delegation_id() {
        let keystore = MemoryKeystore::new();
        let did = claimer(&keystore);
        let claim = Claim::new(Blake3Hash::ZERO, did.did()).with("a", json!("a"));

        let mut request = RequestForAttestation::from_claim(
            claim,
            vec![],
            Some(Blake3Hash::hash(b"delegation")),
            &did,
            &keystore,
        )
        .await
        .unwrap();
        let root = request.compute_root_hash();

        request.delegation_id = None;
        assert_ne!(request.compute_root_hash(), root);
    }

    #[tokio::test]
    async fn test_missing_owner_is_rejected() {
        let keystore = MemoryKeystore::new();
        let did = claimer(&keystore);
        let mut claim = Claim::new(Blake3Hash::ZERO, did.did());
        claim.owner = None;

        let err = RequestForAttestation::from_claim(claim, vec![], None, &did, &keystore)
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::Schema { .. }));
    }

    #[tokio::test]
    async fn test_signer_failure_propagates() {
        let keystore = MemoryKeystore::new();
        let did = claimer(&keystore);
        let empty = MemoryKeystore::new();
        let claim = Claim::new(Blake3Hash::ZERO, did.did());

        let err = RequestForAttestation::from_claim(claim, vec![], None, &did, &empty)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Did(didproof_did::DidError::SigningFailure(_))
        ));
    }
}
