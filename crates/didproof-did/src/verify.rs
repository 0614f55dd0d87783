//! DID-scoped signature verification.
//!
//! A key id is either a full DID URL (`<did>#<fragment>`) or a bare local
//! id. The key must be on the document, in the requested role if one is
//! given, and controlled by the document's own DID. A failed lookup or
//! binding check is a negative result, not an error.

use didproof_core::{parse_did_url, Ed25519PublicKey, Ed25519Signature};
use k256::ecdsa::signature::Verifier as _;
use k256::ecdsa::{Signature as EcdsaSignature, VerifyingKey as EcdsaVerifyingKey};
use tracing::{debug, warn};

use crate::document::{DidDetails, DidSignature};
use crate::error::Result;
use crate::key::{DidKey, KeyRelationship, KeyType};
use crate::resolver::DidResolver;
use crate::signer::KeystoreSigner;

/// Outcome of a signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub verified: bool,
    /// The key that was checked, when one was found and bound to the DID.
    pub key: Option<DidKey>,
}

impl VerificationResult {
    fn rejected() -> Self {
        Self {
            verified: false,
            key: None,
        }
    }
}

/// Check `signature` over `message` with the key `key_id` on `document`.
pub fn verify_did_signature(
    message: &[u8],
    signature: &[u8],
    key_id: &str,
    role: Option<KeyRelationship>,
    document: &dyn DidDetails,
) -> VerificationResult {
    let Some(local_id) = local_key_id(key_id, document.did()) else {
        return VerificationResult::rejected();
    };

    let key = match role {
        Some(role) => document
            .get_keys(Some(role))
            .into_iter()
            .find(|k| k.id == local_id),
        None => document.get_key(local_id),
    };
    let Some(key) = key else {
        debug!(did = document.did(), key_id, ?role, "signing key not found");
        return VerificationResult::rejected();
    };

    if key.controller.as_deref() != Some(document.did()) {
        warn!(
            did = document.did(),
            key_id,
            controller = ?key.controller,
            "key controller does not match DID"
        );
        return VerificationResult::rejected();
    }

    VerificationResult {
        verified: verify_raw(key, message, signature),
        key: Some(key.clone()),
    }
}

/// Like [`verify_did_signature`], resolving the document from `key_id`
/// through `resolver` when none is supplied.
///
/// An unparseable key id or an unknown DID yields `verified == false`.
/// Resolver failures propagate.
pub async fn verify_did_signature_async(
    message: &[u8],
    signature: &[u8],
    key_id: &str,
    role: Option<KeyRelationship>,
    document: Option<&dyn DidDetails>,
    resolver: &dyn DidResolver,
) -> Result<VerificationResult> {
    if let Some(document) = document {
        return Ok(verify_did_signature(message, signature, key_id, role, document));
    }

    let did = match parse_did_url(key_id) {
        Ok(url) => url.did,
        Err(e) => {
            debug!(key_id, error = %e, "key id is not a DID URL");
            return Ok(VerificationResult::rejected());
        }
    };

    match resolver.resolve(&did).await? {
        Some(resolved) => Ok(verify_did_signature(
            message,
            signature,
            key_id,
            role,
            resolved.as_ref(),
        )),
        None => {
            debug!(did = %did, "DID could not be resolved");
            Ok(VerificationResult::rejected())
        }
    }
}

/// Sign `payload` with the document's first authentication key.
pub async fn authenticate_with_did(
    payload: &[u8],
    document: &dyn DidDetails,
    signer: &dyn KeystoreSigner,
) -> Result<DidSignature> {
    let key_id = document.authentication_key()?.id.clone();
    document.sign_payload(payload, &key_id, signer).await
}

/// Reduce `key_id` to a local id on `did`.
fn local_key_id<'a>(key_id: &'a str, did: &str) -> Option<&'a str> {
    if !key_id.contains(':') {
        return (!key_id.is_empty()).then_some(key_id);
    }
    let (key_did, fragment) = key_id.split_once('#')?;
    if key_did != did || fragment.is_empty() {
        debug!(key_id, did, "key id does not belong to DID");
        return None;
    }
    Some(fragment)
}

fn verify_raw(key: &DidKey, message: &[u8], signature: &[u8]) -> bool {
    match key.key_type {
        KeyType::Ed25519 => {
            let (Ok(pk), Ok(sig)) = (
                Ed25519PublicKey::from_slice(&key.public_key),
                Ed25519Signature::from_slice(signature),
            ) else {
                return false;
            };
            pk.verify(message, &sig).is_ok()
        }
        KeyType::Ecdsa => {
            let (Ok(vk), Ok(sig)) = (
                EcdsaVerifyingKey::from_sec1_bytes(&key.public_key),
                EcdsaSignature::from_slice(signature),
            ) else {
                return false;
            };
            vk.verify(message, &sig).is_ok()
        }
        KeyType::Sr25519 => {
            warn!(key_id = %key.id, "sr25519 verification is not supported");
            false
        }
        KeyType::X25519 => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DidCreationDetails, FullDidDetails, LightDidDetails, NewLightDidKey};
    use crate::resolver::MemoryResolver;
    use crate::signer::MemoryKeystore;
    use didproof_core::{full_did, identifier_from_public_key};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn light_identity(keystore: &MemoryKeystore) -> LightDidDetails {
        let public_key = keystore.generate_ed25519();
        LightDidDetails::new(
            NewLightDidKey {
                key_type: KeyType::Ed25519,
                public_key,
            },
            None,
        )
        .unwrap()
    }

    fn full_identity(keystore: &MemoryKeystore, controller: Option<&str>) -> FullDidDetails {
        let ed = keystore.generate_ed25519();
        let ecdsa = keystore.generate_ecdsa();
        let did = full_did(&identifier_from_public_key(&ed));
        let controller = controller.unwrap_or(&did).to_string();

        let mut roles = BTreeMap::new();
        roles.insert(KeyRelationship::Authentication, vec!["auth".to_string()]);
        roles.insert(KeyRelationship::AssertionMethod, vec!["attest".to_string()]);
        FullDidDetails::new(DidCreationDetails {
            did: did.clone(),
            keys: vec![
                DidKey::new("auth", KeyType::Ed25519, ed).with_controller(controller.clone()),
                DidKey::new("attest", KeyType::Ecdsa, ecdsa).with_controller(controller),
            ],
            key_relationships: roles,
            service_endpoints: Vec::new(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_and_verify() {
        let keystore = MemoryKeystore::new();
        let did = light_identity(&keystore);

        let sig = authenticate_with_did(b"hello", &did, &keystore).await.unwrap();
        let bytes = sig.signature_bytes().unwrap();

        let result = verify_did_signature(b"hello", &bytes, &sig.key_id, None, &did);
        assert!(result.verified);
        assert_eq!(result.key.unwrap().id, "authentication");

        let local = verify_did_signature(b"hello", &bytes, "authentication", None, &did);
        assert!(local.verified);

        let tampered = verify_did_signature(b"hellO", &bytes, &sig.key_id, None, &did);
        assert!(!tampered.verified);
    }

    #[tokio::test]
    async fn test_role_constraint() {
        let keystore = MemoryKeystore::new();
        let did = full_identity(&keystore, None);

        let sig = did.sign_payload(b"msg", "attest", &keystore).await.unwrap();
        let bytes = sig.signature_bytes().unwrap();

        let any_role = verify_did_signature(b"msg", &bytes, &sig.key_id, None, &did);
        assert!(any_role.verified);

        let attest = verify_did_signature(
            b"msg",
            &bytes,
            &sig.key_id,
            Some(KeyRelationship::AssertionMethod),
            &did,
        );
        assert!(attest.verified);

        let wrong_role = verify_did_signature(
            b"msg",
            &bytes,
            &sig.key_id,
            Some(KeyRelationship::Authentication),
            &did,
        );
        assert!(!wrong_role.verified);
        assert!(wrong_role.key.is_none());
    }

    #[tokio::test]
    async fn test_controller_mismatch_is_rejected() {
        let keystore = MemoryKeystore::new();
        let other = full_did(&identifier_from_public_key(&[0xee; 32]));
        let did = full_identity(&keystore, Some(&other));

        let sig = authenticate_with_did(b"msg", &did, &keystore).await.unwrap();
        let bytes = sig.signature_bytes().unwrap();

        // Bytes are a valid signature, but the key is controlled elsewhere.
        let result = verify_did_signature(b"msg", &bytes, &sig.key_id, None, &did);
        assert!(!result.verified);
    }

    #[tokio::test]
    async fn test_key_id_of_other_did_is_rejected() {
        let keystore = MemoryKeystore::new();
        let a = light_identity(&keystore);
        let b = light_identity(&keystore);

        let sig = authenticate_with_did(b"msg", &a, &keystore).await.unwrap();
        let bytes = sig.signature_bytes().unwrap();
        assert!(!verify_did_signature(b"msg", &bytes, &sig.key_id, None, &b).verified);
    }

    #[tokio::test]
    async fn test_async_verification_resolves() {
        let keystore = MemoryKeystore::new();
        let did = light_identity(&keystore);
        let resolver = MemoryResolver::new();

        let sig = authenticate_with_did(b"msg", &did, &keystore).await.unwrap();
        let bytes = sig.signature_bytes().unwrap();

        let unresolved =
            verify_did_signature_async(b"msg", &bytes, &sig.key_id, None, None, &resolver)
                .await
                .unwrap();
        assert!(!unresolved.verified);

        resolver.insert(Arc::new(did.clone()));
        let resolved =
            verify_did_signature_async(b"msg", &bytes, &sig.key_id, None, None, &resolver)
                .await
                .unwrap();
        assert!(resolved.verified);

        let document: &dyn DidDetails = &did;
        let supplied = verify_did_signature_async(
            b"msg",
            &bytes,
            &sig.key_id,
            None,
            Some(document),
            &resolver,
        )
        .await
        .unwrap();
        assert!(supplied.verified);

        let malformed =
            verify_did_signature_async(b"msg", &bytes, "not-a-did", None, None, &resolver)
                .await
                .unwrap();
        assert!(!malformed.verified);
    }

    #[test]
    fn test_sr25519_and_garbage_signatures() {
        let did = LightDidDetails::new(
            NewLightDidKey {
                key_type: KeyType::Sr25519,
                public_key: vec![5; 32],
            },
            None,
        )
        .unwrap();
        assert!(!verify_did_signature(b"m", &[0u8; 64], "authentication", None, &did).verified);

        let keystore = MemoryKeystore::new();
        let ed = light_identity(&keystore);
        assert!(!verify_did_signature(b"m", &[1, 2, 3], "authentication", None, &ed).verified);
    }
}
