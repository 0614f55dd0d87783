//! Public keys and the roles they play on a DID document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Algorithm tag of a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Ed25519,
    Sr25519,
    Ecdsa,
    /// Encryption-only.
    X25519,
}

impl KeyType {
    /// Signature scheme for this key type, `None` for encryption-only keys.
    pub fn signature_algorithm(self) -> Option<SignatureAlgorithm> {
        match self {
            KeyType::Ed25519 => Some(SignatureAlgorithm::Ed25519),
            KeyType::Sr25519 => Some(SignatureAlgorithm::Sr25519),
            KeyType::Ecdsa => Some(SignatureAlgorithm::EcdsaSecp256k1),
            KeyType::X25519 => None,
        }
    }

    /// Whether keys of this type can produce signatures.
    pub fn is_signing(self) -> bool {
        self.signature_algorithm().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::Sr25519 => "sr25519",
            KeyType::Ecdsa => "ecdsa",
            KeyType::X25519 => "x25519",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature scheme identifier handed to a [`KeystoreSigner`](crate::KeystoreSigner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "ed25519")]
    Ed25519,
    #[serde(rename = "sr25519")]
    Sr25519,
    #[serde(rename = "ecdsa-secp256k1")]
    EcdsaSecp256k1,
}

impl SignatureAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureAlgorithm::Ed25519 => "ed25519",
            SignatureAlgorithm::Sr25519 => "sr25519",
            SignatureAlgorithm::EcdsaSecp256k1 => "ecdsa-secp256k1",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Functional role of a key on a document.
///
/// Ordering is the serialization order of the role index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyRelationship {
    /// Signs on behalf of the DID subject.
    Authentication,
    /// Encryption.
    KeyAgreement,
    /// Issues attestations.
    AssertionMethod,
    /// Signs delegation nodes.
    CapabilityDelegation,
}

impl KeyRelationship {
    pub const ALL: [KeyRelationship; 4] = [
        KeyRelationship::Authentication,
        KeyRelationship::KeyAgreement,
        KeyRelationship::AssertionMethod,
        KeyRelationship::CapabilityDelegation,
    ];
}

/// A public key on a DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidKey {
    /// Local id, unique within the document.
    pub id: String,

    #[serde(rename = "type")]
    pub key_type: KeyType,

    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,

    /// DID that controls this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
}

impl DidKey {
    pub fn new(id: impl Into<String>, key_type: KeyType, public_key: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            key_type,
            public_key,
            controller: None,
        }
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_table() {
        assert_eq!(
            KeyType::Ed25519.signature_algorithm(),
            Some(SignatureAlgorithm::Ed25519)
        );
        assert_eq!(
            KeyType::Sr25519.signature_algorithm(),
            Some(SignatureAlgorithm::Sr25519)
        );
        assert_eq!(
            KeyType::Ecdsa.signature_algorithm(),
            Some(SignatureAlgorithm::EcdsaSecp256k1)
        );
        assert_eq!(KeyType::X25519.signature_algorithm(), None);
        assert!(!KeyType::X25519.is_signing());
    }

    #[test]
    fn test_key_json_shape() {
        let key = DidKey::new("auth", KeyType::Ed25519, vec![0xab, 0xcd]).with_controller("did:x");
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["type"], "ed25519");
        assert_eq!(json["publicKey"], "abcd");
        assert_eq!(json["controller"], "did:x");

        let back: DidKey = serde_json::from_value(json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(SignatureAlgorithm::EcdsaSecp256k1.to_string(), "ecdsa-secp256k1");
        assert_eq!(
            serde_json::to_value(KeyRelationship::AssertionMethod).unwrap(),
            "assertionMethod"
        );
    }
}
