//! # didproof core
//!
//! Pure primitives shared by the DID document model and the credential
//! commitment protocol.
//!
//! This crate contains no I/O and no async code. It is pure computation
//! over hashes, keys and identifier strings.
//!
//! ## Key Types
//!
//! - [`Blake3Hash`] - 32-byte commitment / root hash
//! - [`Nonce`] - 32-byte salt used in commit-and-reveal leaves
//! - [`Keypair`] - Ed25519 signing key used by in-memory keystores
//! - [`DidUrl`] - Parsed `did:kilt:<identifier>[#fragment]` string
//!
//! ## Canonicalization
//!
//! Claim values are hashed over deterministic CBOR. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod did;
pub mod error;

pub use canonical::{canonical_value_bytes, commitment_hash};
pub use crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair, Nonce};
pub use did::{
    full_did, identifier_from_public_key, light_did, parse_did_url, validate_did, DidUrl,
    DID_PREFIX, IDENTIFIER_LEN, LIGHT_DID_PREFIX,
};
pub use error::CoreError;
