//! End-to-end verification of requests and credentials.

use std::sync::Arc;

use async_trait::async_trait;
use didproof::core::Blake3Hash;
use didproof::did::Result as DidResult;
use didproof::{
    CredentialError, CredentialVerifier, DidDetails, DidError, DidResolver, Error,
    MemoryResolver, RequestForAttestation, VerifierConfig,
};
use didproof_testkit::TestIdentity;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn verifier_for(identities: &[&TestIdentity]) -> CredentialVerifier<MemoryResolver> {
    verifier_with(identities, VerifierConfig::default())
}

fn verifier_with(
    identities: &[&TestIdentity],
    config: VerifierConfig,
) -> CredentialVerifier<MemoryResolver> {
    let resolver = MemoryResolver::new();
    for identity in identities {
        identity.publish(&resolver);
    }
    CredentialVerifier::new(resolver, config)
}

#[tokio::test]
async fn test_fresh_credential_verifies() {
    init_tracing();
    let claimer = TestIdentity::light();
    let attester = TestIdentity::full();

    let request = claimer
        .build_request(json!({"name": "Alice", "age": 29}), vec![])
        .await;
    let credential = attester.attest(request.clone());

    let verifier = verifier_for(&[&claimer, &attester]);
    assert!(verifier.verify_request(&request).await.unwrap());
    assert!(verifier.verify_attested_claim(&credential).await.unwrap());
}

#[tokio::test]
async fn test_full_did_claimer() {
    init_tracing();
    let claimer = TestIdentity::full();
    let request = claimer.build_request(json!({"role": "admin"}), vec![]).await;

    let verifier = verifier_for(&[&claimer]);
    assert!(verifier.verify_request(&request).await.unwrap());
    assert!(request.verify_signature(claimer.did.as_ref()).unwrap());
}

#[tokio::test]
async fn test_presentation_verifies() {
    init_tracing();
    let claimer = TestIdentity::light();
    let attester = TestIdentity::full();

    let request = claimer
        .build_request(json!({"name": "Alice", "age": 29, "email": "a@example.com"}), vec![])
        .await;
    let credential = attester.attest(request);
    let presentation = credential.create_presentation(["age", "email"], true);

    assert_eq!(
        presentation.request.disclosed_properties().collect::<Vec<_>>(),
        vec!["name"]
    );
    let verifier = verifier_for(&[&claimer]);
    assert!(verifier.verify_attested_claim(&presentation).await.unwrap());
}

#[tokio::test]
async fn test_unknown_claimer_is_not_verified() {
    init_tracing();
    let claimer = TestIdentity::light();
    let request = claimer.build_request(json!({"a": "a"}), vec![]).await;

    let verifier = verifier_for(&[]);
    assert!(!verifier.verify_request(&request).await.unwrap());
}

#[tokio::test]
async fn test_tampered_signature_is_not_verified() {
    init_tracing();
    let claimer = TestIdentity::light();
    let other = TestIdentity::light();
    let request = claimer.build_request(json!({"a": "a"}), vec![]).await;

    // Signature made by a different DID over the same root hash.
    let forged = other
        .did
        .sign_payload(
            request.root_hash.as_bytes(),
            &other.did.authentication_key().unwrap().id,
            &other.keystore,
        )
        .await
        .unwrap();
    let mut tampered = request.clone();
    tampered.claimer_signature.signature = forged.signature;

    let verifier = verifier_for(&[&claimer, &other]);
    assert!(!verifier.verify_request(&tampered).await.unwrap());
}

#[tokio::test]
async fn test_broken_integrity_is_an_error() {
    init_tracing();
    let claimer = TestIdentity::light();
    let mut request = claimer.build_request(json!({"a": "a"}), vec![]).await;
    request.claim.contents.insert("a".into(), json!("b"));

    let verifier = verifier_for(&[&claimer]);
    let err = verifier.verify_request(&request).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Credential(CredentialError::Integrity { .. })
    ));
}

#[tokio::test]
async fn test_revoked_attestation() {
    init_tracing();
    let claimer = TestIdentity::light();
    let attester = TestIdentity::full();
    let request = claimer.build_request(json!({"a": "a"}), vec![]).await;
    let mut credential = attester.attest(request);
    credential.attestation.revoked = true;

    let verifier = verifier_for(&[&claimer]);
    assert!(!verifier.verify_attested_claim(&credential).await.unwrap());

    let lenient = verifier_with(
        &[&claimer],
        VerifierConfig {
            reject_revoked: false,
            ..VerifierConfig::default()
        },
    );
    assert!(lenient.verify_attested_claim(&credential).await.unwrap());
}

#[tokio::test]
async fn test_attestation_for_other_request() {
    init_tracing();
    let claimer = TestIdentity::light();
    let attester = TestIdentity::full();
    let first = claimer.build_request(json!({"a": "a"}), vec![]).await;
    let second = claimer.build_request(json!({"a": "a"}), vec![]).await;

    let mut credential = attester.attest(first);
    credential.request = second;

    let verifier = verifier_for(&[&claimer]);
    let err = verifier.verify_attested_claim(&credential).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Credential(CredentialError::AttestationMismatch(_))
    ));
}

#[tokio::test]
async fn test_legitimations_are_verified() {
    init_tracing();
    let claimer = TestIdentity::light();
    let charlie = TestIdentity::light();
    let attester = TestIdentity::full();

    let legitimation = attester.attest(charlie.build_request(json!({}), vec![]).await);
    let request = claimer
        .build_request(json!({"a": "a"}), vec![legitimation])
        .await;

    let with_charlie = verifier_for(&[&claimer, &charlie]);
    assert!(with_charlie.verify_request(&request).await.unwrap());

    // Charlie's DID cannot be resolved, so the legitimation fails.
    let without_charlie = verifier_for(&[&claimer]);
    assert!(!without_charlie.verify_request(&request).await.unwrap());

    let skip = verifier_with(
        &[&claimer],
        VerifierConfig {
            verify_legitimations: false,
            ..VerifierConfig::default()
        },
    );
    assert!(skip.verify_request(&request).await.unwrap());
}

#[tokio::test]
async fn test_legitimation_depth_limit() {
    init_tracing();
    let claimer = TestIdentity::light();
    let attester = TestIdentity::full();

    let mut credential = attester.attest(claimer.build_request(json!({}), vec![]).await);
    for level in 0..3 {
        let request = claimer
            .build_request(json!({ "level": level }), vec![credential])
            .await;
        credential = attester.attest(request);
    }

    let shallow = verifier_with(
        &[&claimer],
        VerifierConfig {
            max_legitimation_depth: 2,
            ..VerifierConfig::default()
        },
    );
    assert!(matches!(
        shallow.verify_attested_claim(&credential).await,
        Err(Error::LegitimationDepthExceeded { max_depth: 2 })
    ));

    let deep = verifier_for(&[&claimer]);
    assert!(deep.verify_attested_claim(&credential).await.unwrap());
}

#[tokio::test]
async fn test_claimer_key_relationship() {
    init_tracing();
    let claimer = TestIdentity::full();

    // Signed with the assertion key instead of the authentication key.
    let mut request = claimer.build_request(json!({"a": "a"}), vec![]).await;
    request.claimer_signature = claimer
        .did
        .sign_payload(request.root_hash.as_bytes(), "attest", &claimer.keystore)
        .await
        .unwrap();

    let strict = verifier_for(&[&claimer]);
    assert!(!strict.verify_request(&request).await.unwrap());

    let any_key = verifier_with(
        &[&claimer],
        VerifierConfig {
            claimer_key_relationship: None,
            ..VerifierConfig::default()
        },
    );
    assert!(any_key.verify_request(&request).await.unwrap());
}

struct FailingResolver;

#[async_trait]
impl DidResolver for FailingResolver {
    async fn resolve(&self, _did: &str) -> DidResult<Option<Arc<dyn DidDetails>>> {
        Err(DidError::ResolutionFailure("backend unavailable".into()))
    }
}

#[tokio::test]
async fn test_resolver_failure_propagates() {
    init_tracing();
    let claimer = TestIdentity::light();
    let request = claimer.build_request(json!({"a": "a"}), vec![]).await;

    let verifier = CredentialVerifier::new(FailingResolver, VerifierConfig::default());
    assert!(matches!(
        verifier.verify_request(&request).await,
        Err(Error::Did(DidError::ResolutionFailure(_)))
    ));
}

#[tokio::test]
async fn test_json_round_trip_still_verifies() {
    init_tracing();
    let claimer = TestIdentity::light();
    let request = claimer
        .build_request(json!({"nested": {"b": [1, 2], "a": null}}), vec![])
        .await;
    let json = serde_json::to_value(&request).unwrap();
    let parsed = RequestForAttestation::from_value(json).unwrap();

    let verifier = verifier_for(&[&claimer]);
    assert!(verifier.verify_request(&parsed).await.unwrap());
    assert_eq!(parsed.claim.ctype_hash, Blake3Hash::hash(didproof_testkit::TEST_CTYPE));
}
