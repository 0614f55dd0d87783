//! # didproof credential
//!
//! Claims, salted commitments and the credentials built from them.
//!
//! - [`RequestForAttestation`] - A claimer-signed commitment to a [`Claim`]:
//!   one salted leaf per property, owner and claim type commitments, and a
//!   root hash over all of them.
//! - Selective disclosure: [`RequestForAttestation::hide_properties`] and
//!   [`RequestForAttestation::hide_owner`] return redacted copies whose root
//!   hash still verifies.
//! - [`Attestation`] / [`AttestedClaim`] - An attester's endorsement and the
//!   resulting credential, usable as a legitimation for later requests.
//! - A compact array-based wire form (`compress` / `decompress`).

pub mod attestation;
pub mod claim;
pub mod compress;
pub mod disclosure;
pub mod error;
pub mod nonce_hash;
pub mod request;

pub use attestation::{Attestation, AttestedClaim};
pub use claim::{Claim, ClaimContents};
pub use error::{CredentialError, Result};
pub use nonce_hash::NonceHash;
pub use request::{ClaimHashTree, RequestForAttestation};
