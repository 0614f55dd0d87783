//! # didproof testkit
//!
//! Testing utilities for didproof.
//!
//! - **Fixtures**: claimer and attester identities with their own keystores
//! - **Generators**: proptest strategies for claim contents and hashes
//! - **Golden vectors**: canonical encodings that every implementation must
//!   reproduce byte for byte
//!
//! ## Golden Vectors
//!
//! ```rust
//! use didproof_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use didproof_testkit::fixtures::TestIdentity;
//!
//! async fn example() {
//!     let claimer = TestIdentity::light();
//!     let attester = TestIdentity::full();
//!     let request = claimer
//!         .build_request(serde_json::json!({"name": "Alice"}), vec![])
//!         .await;
//!     let credential = attester.attest(request);
//!     assert!(credential.verify_data().is_ok());
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_identities, TestIdentity, TEST_CTYPE};
pub use generators::{claim_contents, json_value, property_name};
pub use vectors::{all_vectors, verify_all_vectors, CanonicalVector};
