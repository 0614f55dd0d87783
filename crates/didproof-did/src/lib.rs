//! # didproof DID
//!
//! The DID document model: public keys organized by verification
//! relationship, service endpoints, role-scoped lookup and payload signing.
//!
//! ## Overview
//!
//! - [`DidDetails`] - The capability set every DID variant exposes
//! - [`FullDidDetails`] - Ledger-anchored DID with arbitrary keys and endpoints
//! - [`LightDidDetails`] - Off-chain DID derived from its authentication key
//! - [`KeystoreSigner`] - Injected async signing capability
//! - [`DidResolver`] - Injected async resolution capability
//! - [`verify_did_signature`] / [`verify_did_signature_async`] - DID-scoped
//!   signature verification with key-controller binding
//!
//! ## Usage
//!
//! ```rust,no_run
//! use didproof_did::{authenticate_with_did, verify_did_signature, DidDetails, KeyType,
//!     LightDidDetails, MemoryKeystore, NewLightDidKey};
//!
//! async fn example() {
//!     let keystore = MemoryKeystore::new();
//!     let public_key = keystore.generate_ed25519();
//!     let did = LightDidDetails::new(
//!         NewLightDidKey { key_type: KeyType::Ed25519, public_key },
//!         None,
//!     )
//!     .unwrap();
//!
//!     let signature = authenticate_with_did(b"hello", &did, &keystore).await.unwrap();
//!     let bytes = signature.signature_bytes().unwrap();
//!     let result = verify_did_signature(b"hello", &bytes, &signature.key_id, None, &did);
//!     assert!(result.verified);
//! }
//! ```

pub mod document;
pub mod endpoint;
pub mod error;
pub mod key;
pub mod resolver;
pub mod signer;
pub mod verify;

pub use document::{
    DidCreationDetails, DidDetails, DidDocument, DidSignature, FullDidDetails, LightDidDetails,
    NewLightDidKey,
};
pub use endpoint::ServiceEndpoint;
pub use error::{DidError, Result};
pub use key::{DidKey, KeyRelationship, KeyType, SignatureAlgorithm};
pub use resolver::{DidResolver, MemoryResolver};
pub use signer::{KeystoreSigner, MemoryKeystore, SignRequest};
pub use verify::{
    authenticate_with_did, verify_did_signature, verify_did_signature_async, VerificationResult,
};
