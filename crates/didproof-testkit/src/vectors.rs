//! Golden test vectors for deterministic verification.
//!
//! Claim values are committed to through their canonical CBOR encoding.
//! These vectors pin that encoding so every implementation hashes the same
//! value to the same bytes.

use didproof_core::{canonical_value_bytes, Blake3Hash};

/// A golden canonical-encoding vector.
#[derive(Debug, Clone)]
pub struct CanonicalVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input value as JSON text.
    pub json: &'static str,
    /// Expected canonical CBOR (hex).
    pub expected_cbor: &'static str,
}

/// Blake3 of the empty input.
pub const EMPTY_BLAKE3: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

/// Get all golden vectors.
pub fn all_vectors() -> Vec<CanonicalVector> {
    vec![
        CanonicalVector {
            name: "short text",
            json: r#""a""#,
            expected_cbor: "6161",
        },
        CanonicalVector {
            name: "empty text",
            json: r#""""#,
            expected_cbor: "60",
        },
        CanonicalVector {
            name: "non-ascii text is UTF-8",
            json: r#""ünï""#,
            expected_cbor: "65c3bc6ec3af",
        },
        CanonicalVector {
            name: "one-byte unsigned",
            json: "29",
            expected_cbor: "181d",
        },
        CanonicalVector {
            name: "four-byte unsigned",
            json: "1000000",
            expected_cbor: "1a000f4240",
        },
        CanonicalVector {
            name: "negative one",
            json: "-1",
            expected_cbor: "20",
        },
        CanonicalVector {
            name: "two-byte negative",
            json: "-500",
            expected_cbor: "3901f3",
        },
        CanonicalVector {
            name: "true",
            json: "true",
            expected_cbor: "f5",
        },
        CanonicalVector {
            name: "null",
            json: "null",
            expected_cbor: "f6",
        },
        CanonicalVector {
            name: "float is always 64-bit",
            json: "1.5",
            expected_cbor: "fb3ff8000000000000",
        },
        CanonicalVector {
            name: "array",
            json: r#"[1,"x",[]]"#,
            expected_cbor: "8301617880",
        },
        CanonicalVector {
            name: "map keys sorted",
            json: r#"{"b":1,"a":2}"#,
            expected_cbor: "a2616102616201",
        },
        CanonicalVector {
            name: "shorter key first",
            json: r#"{"name":"Alice","age":29}"#,
            expected_cbor: "a263616765181d646e616d6565416c696365",
        },
        CanonicalVector {
            name: "nested map",
            json: r#"{"address":{"city":"Berlin","zip":"10115"},"verified":false}"#,
            expected_cbor: "a26761646472657373a2637a69706531303131356463697479664265726c696e687665726966696564f4",
        },
    ]
}

/// Check every vector, returning the name of the first one that fails.
pub fn verify_all_vectors() -> Result<(), String> {
    if Blake3Hash::hash(b"").to_hex() != EMPTY_BLAKE3 {
        return Err("blake3 of empty input".into());
    }
    for vector in all_vectors() {
        let value: serde_json::Value =
            serde_json::from_str(vector.json).map_err(|e| format!("{}: {}", vector.name, e))?;
        let encoded = canonical_value_bytes(&value).map_err(|e| format!("{}: {}", vector.name, e))?;
        if hex::encode(encoded) != vector.expected_cbor {
            return Err(vector.name.to_string());
        }
    }
    Ok(())
}
