//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use didproof_core::{full_did, identifier_from_public_key, Blake3Hash, Keypair};
use didproof_credential::{Attestation, AttestedClaim, Claim, ClaimContents, RequestForAttestation};
use didproof_did::{
    DidCreationDetails, DidDetails, DidKey, FullDidDetails, KeyRelationship, KeyType,
    LightDidDetails, MemoryKeystore, MemoryResolver, NewLightDidKey, ServiceEndpoint,
};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

/// Claim type hash used by fixture claims.
pub const TEST_CTYPE: &[u8] = b"didproof/test-ctype/v1";

/// A DID with a keystore holding its secrets.
pub struct TestIdentity {
    pub keystore: MemoryKeystore,
    pub did: Arc<dyn DidDetails>,
}

impl TestIdentity {
    /// A light DID with a random Ed25519 authentication key and an X25519
    /// encryption key.
    pub fn light() -> Self {
        Self::light_with_keypair(Keypair::generate())
    }

    /// A light DID derived from a fixed seed.
    pub fn light_from_seed(seed: [u8; 32]) -> Self {
        Self::light_with_keypair(Keypair::from_seed(&seed))
    }

    fn light_with_keypair(keypair: Keypair) -> Self {
        let keystore = MemoryKeystore::new();
        let public_key = keystore.insert_ed25519(keypair);
        let encryption = X25519PublicKey::from(&StaticSecret::random_from_rng(rand::thread_rng()));

        let did = LightDidDetails::new(
            NewLightDidKey {
                key_type: KeyType::Ed25519,
                public_key,
            },
            Some(NewLightDidKey {
                key_type: KeyType::X25519,
                public_key: encryption.as_bytes().to_vec(),
            }),
        )
        .expect("fixture light DID is valid");

        Self {
            keystore,
            did: Arc::new(did),
        }
    }

    /// A full DID with one key per role and a service endpoint.
    ///
    /// | id             | type    | role                 |
    /// |----------------|---------|----------------------|
    /// | `auth`         | Ed25519 | authentication       |
    /// | `enc`          | X25519  | key agreement        |
    /// | `attest`       | ECDSA   | assertion method     |
    /// | `delegate`     | Ed25519 | capability delegation|
    pub fn full() -> Self {
        let keystore = MemoryKeystore::new();
        let auth = keystore.generate_ed25519();
        let attest = keystore.generate_ecdsa();
        let delegate = keystore.generate_ed25519();
        let enc = X25519PublicKey::from(&StaticSecret::random_from_rng(rand::thread_rng()))
            .as_bytes()
            .to_vec();

        let did = full_did(&identifier_from_public_key(&auth));
        let key = |id: &str, key_type, public_key| {
            DidKey::new(id, key_type, public_key).with_controller(did.clone())
        };

        let mut roles = BTreeMap::new();
        roles.insert(KeyRelationship::Authentication, vec!["auth".to_string()]);
        roles.insert(KeyRelationship::KeyAgreement, vec!["enc".to_string()]);
        roles.insert(KeyRelationship::AssertionMethod, vec!["attest".to_string()]);
        roles.insert(
            KeyRelationship::CapabilityDelegation,
            vec!["delegate".to_string()],
        );

        let details = FullDidDetails::new(DidCreationDetails {
            did: did.clone(),
            keys: vec![
                key("auth", KeyType::Ed25519, auth),
                key("enc", KeyType::X25519, enc),
                key("attest", KeyType::Ecdsa, attest),
                key("delegate", KeyType::Ed25519, delegate),
            ],
            key_relationships: roles,
            service_endpoints: vec![ServiceEndpoint::new(
                "credential-service",
                vec!["CredentialService".into()],
                vec!["https://credentials.example.com".into()],
            )],
        })
        .expect("fixture full DID is valid");

        Self {
            keystore,
            did: Arc::new(details),
        }
    }

    pub fn did(&self) -> &str {
        self.did.did()
    }

    /// A claim about this identity under [`TEST_CTYPE`].
    ///
    /// `contents` must be a JSON object.
    pub fn claim(&self, contents: serde_json::Value) -> Claim {
        let contents: ClaimContents =
            serde_json::from_value(contents).expect("claim contents must be an object");
        Claim::new(Blake3Hash::hash(TEST_CTYPE), self.did()).with_contents(contents)
    }

    /// Build and sign a request for a claim with `contents`.
    pub async fn build_request(
        &self,
        contents: serde_json::Value,
        legitimations: Vec<AttestedClaim>,
    ) -> RequestForAttestation {
        self.build_request_for(self.claim(contents), legitimations, None)
            .await
    }

    pub async fn build_request_for(
        &self,
        claim: Claim,
        legitimations: Vec<AttestedClaim>,
        delegation_id: Option<Blake3Hash>,
    ) -> RequestForAttestation {
        RequestForAttestation::from_claim(
            claim,
            legitimations,
            delegation_id,
            self.did.as_ref(),
            &self.keystore,
        )
        .await
        .expect("fixture request builds")
    }

    /// Attest `request` with this identity as attester.
    pub fn attest(&self, request: RequestForAttestation) -> AttestedClaim {
        let attestation = Attestation::from_request(&request, self.did());
        AttestedClaim::from_request_and_attestation(request, attestation)
    }

    /// Make this identity resolvable through `resolver`.
    pub fn publish(&self, resolver: &MemoryResolver) {
        resolver.insert(Arc::clone(&self.did));
    }
}

/// Create `count` independent light identities.
pub fn multi_party_identities(count: usize) -> Vec<TestIdentity> {
    (0..count).map(|_| TestIdentity::light()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_light_identity_from_seed_is_deterministic() {
        let a = TestIdentity::light_from_seed([1; 32]);
        let b = TestIdentity::light_from_seed([1; 32]);
        assert_eq!(a.did(), b.did());
        assert!(a.did.encryption_key().is_some());
    }

    #[test]
    fn test_full_identity_roles() {
        let identity = TestIdentity::full();
        assert_eq!(identity.did.authentication_key().unwrap().id, "auth");
        assert_eq!(identity.did.encryption_key().unwrap().id, "enc");
        assert_eq!(identity.did.attestation_key().unwrap().id, "attest");
        assert_eq!(identity.did.delegation_key().unwrap().id, "delegate");
        assert_eq!(identity.did.get_endpoints(Some("CredentialService")).len(), 1);
        assert_eq!(identity.keystore.len(), 3);
    }

    #[tokio::test]
    async fn test_request_and_attest() {
        let claimer = TestIdentity::light();
        let attester = TestIdentity::full();

        let request = claimer.build_request(json!({"name": "Alice"}), vec![]).await;
        let credential = attester.attest(request);
        credential.verify_data().unwrap();
        assert_eq!(credential.attestation.owner, attester.did());
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_identities(3);
        assert_ne!(parties[0].did(), parties[1].did());
        assert_ne!(parties[1].did(), parties[2].did());
    }
}
