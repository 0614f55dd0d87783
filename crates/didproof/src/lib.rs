//! # didproof
//!
//! Decentralized identifiers and selectively disclosable credentials.
//!
//! ## Overview
//!
//! - **DID documents**: public keys organized by role (authentication,
//!   key agreement, assertion, delegation), service endpoints, payload
//!   signing through an injected keystore
//! - **Requests for attestation**: salted per-property commitments folded
//!   into a root hash the claimer signs
//! - **Selective disclosure**: hide properties or the owner without
//!   invalidating the root hash
//! - **Credentials**: attested requests, reusable as legitimations
//! - **Verification**: shape, integrity and DID-bound signature checks with
//!   DIDs resolved through an injected resolver
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use didproof::{
//!     Attestation, AttestedClaim, Claim, CredentialVerifier, DidDetails, KeyType,
//!     LightDidDetails, MemoryKeystore, MemoryResolver, NewLightDidKey, RequestForAttestation,
//!     VerifierConfig,
//! };
//! use didproof::core::Blake3Hash;
//!
//! async fn example() {
//!     let keystore = MemoryKeystore::new();
//!     let claimer = LightDidDetails::new(
//!         NewLightDidKey { key_type: KeyType::Ed25519, public_key: keystore.generate_ed25519() },
//!         None,
//!     )
//!     .unwrap();
//!
//!     let claim = Claim::new(Blake3Hash::hash(b"ctype"), claimer.did())
//!         .with("name", serde_json::json!("Alice"));
//!     let request = RequestForAttestation::from_claim(claim, vec![], None, &claimer, &keystore)
//!         .await
//!         .unwrap();
//!
//!     let attestation = Attestation::from_request(&request, claimer.did());
//!     let credential = AttestedClaim::from_request_and_attestation(request, attestation);
//!     let presentation = credential.create_presentation(["name"], false);
//!
//!     let resolver = MemoryResolver::new();
//!     resolver.insert(Arc::new(claimer));
//!     let verifier = CredentialVerifier::new(resolver, VerifierConfig::default());
//!     assert!(verifier.verify_attested_claim(&presentation).await.unwrap());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `didproof::core` - Hashes, nonces, canonical encoding, DID grammar
//! - `didproof::did` - DID documents, signer and resolver seams
//! - `didproof::credential` - Claims, requests, attestations, wire codec

pub mod error;
pub mod verifier;

// Re-export component crates
pub use didproof_core as core;
pub use didproof_credential as credential;
pub use didproof_did as did;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use verifier::{CredentialVerifier, VerifierConfig};

pub use didproof_credential::{
    Attestation, AttestedClaim, Claim, ClaimHashTree, CredentialError, NonceHash,
    RequestForAttestation,
};
pub use didproof_did::{
    authenticate_with_did, verify_did_signature, verify_did_signature_async, DidCreationDetails,
    DidDetails, DidError, DidKey, DidResolver, DidSignature, FullDidDetails, KeyRelationship,
    KeyType, KeystoreSigner, LightDidDetails, MemoryKeystore, MemoryResolver, NewLightDidKey,
    ServiceEndpoint,
};
