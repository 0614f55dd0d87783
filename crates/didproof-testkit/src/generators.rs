//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use didproof_core::{Blake3Hash, Nonce};
use didproof_credential::ClaimContents;

/// Generate a random Blake3Hash.
pub fn blake3_hash() -> impl Strategy<Value = Blake3Hash> {
    any::<[u8; 32]>().prop_map(Blake3Hash)
}

/// Generate a random Nonce.
pub fn nonce() -> impl Strategy<Value = Nonce> {
    any::<[u8; 32]>().prop_map(Nonce::from_bytes)
}

/// Generate a claim property name.
pub fn property_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a JSON value without floats, nested at most three levels.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(property_name(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Generate claim contents with up to `max_properties` entries.
pub fn claim_contents(max_properties: usize) -> impl Strategy<Value = ClaimContents> {
    prop::collection::btree_map(property_name(), json_value(), 0..=max_properties)
}
