//! Keystore signer: the injected signing capability.
//!
//! Documents never hold private keys. Payload signing looks up the key's
//! algorithm on the document and hands the raw bytes to a [`KeystoreSigner`]
//! that owns the secrets. [`MemoryKeystore`] is the in-process
//! implementation used by tests and local tooling.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use didproof_core::Keypair;
use k256::ecdsa::signature::Signer as _;
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey as EcdsaSigningKey};

use crate::error::{DidError, Result};
use crate::key::SignatureAlgorithm;

/// A raw signing request.
#[derive(Debug, Clone, Copy)]
pub struct SignRequest<'a> {
    /// Public key identifying the secret to sign with.
    pub public_key: &'a [u8],
    pub algorithm: SignatureAlgorithm,
    pub data: &'a [u8],
}

/// Async signing capability.
///
/// Failures must be reported as [`DidError::SigningFailure`].
#[async_trait]
pub trait KeystoreSigner: Send + Sync {
    /// Sign `request.data` with the secret behind `request.public_key`.
    async fn sign(&self, request: SignRequest<'_>) -> Result<Vec<u8>>;
}

enum StoredSecret {
    Ed25519(Keypair),
    Ecdsa(EcdsaSigningKey),
}

impl StoredSecret {
    fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            StoredSecret::Ed25519(_) => SignatureAlgorithm::Ed25519,
            StoredSecret::Ecdsa(_) => SignatureAlgorithm::EcdsaSecp256k1,
        }
    }
}

/// In-memory keystore for Ed25519 and secp256k1 ECDSA keys.
///
/// Secrets are indexed by public key bytes. Ed25519 public keys are the raw
/// 32 bytes; ECDSA public keys are SEC1 compressed points (33 bytes).
pub struct MemoryKeystore {
    secrets: RwLock<HashMap<Vec<u8>, StoredSecret>>,
}

impl MemoryKeystore {
    /// Create an empty keystore.
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    /// Generate and store a fresh Ed25519 key, returning its public key.
    pub fn generate_ed25519(&self) -> Vec<u8> {
        self.insert_ed25519(Keypair::generate())
    }

    /// Store an existing Ed25519 keypair, returning its public key.
    pub fn insert_ed25519(&self, keypair: Keypair) -> Vec<u8> {
        let public_key = keypair.public_key().as_bytes().to_vec();
        self.insert(public_key.clone(), StoredSecret::Ed25519(keypair));
        public_key
    }

    /// Generate and store a fresh secp256k1 key, returning its compressed
    /// SEC1 public key.
    pub fn generate_ecdsa(&self) -> Vec<u8> {
        self.insert_ecdsa(EcdsaSigningKey::random(&mut rand::rngs::OsRng))
    }

    /// Derive a secp256k1 key from a 32-byte secret scalar.
    pub fn ecdsa_from_seed(&self, seed: &[u8; 32]) -> Result<Vec<u8>> {
        let key = EcdsaSigningKey::from_slice(seed)
            .map_err(|e| DidError::SigningFailure(format!("invalid secp256k1 secret: {}", e)))?;
        Ok(self.insert_ecdsa(key))
    }

    fn insert_ecdsa(&self, key: EcdsaSigningKey) -> Vec<u8> {
        let public_key = key.verifying_key().to_encoded_point(true).as_bytes().to_vec();
        self.insert(public_key.clone(), StoredSecret::Ecdsa(key));
        public_key
    }

    fn insert(&self, public_key: Vec<u8>, secret: StoredSecret) {
        let mut secrets = self.secrets.write().unwrap_or_else(|e| e.into_inner());
        secrets.insert(public_key, secret);
    }

    /// Number of stored secrets.
    pub fn len(&self) -> usize {
        self.secrets.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryKeystore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeystoreSigner for MemoryKeystore {
    async fn sign(&self, request: SignRequest<'_>) -> Result<Vec<u8>> {
        let secrets = self
            .secrets
            .read()
            .map_err(|_| DidError::SigningFailure("keystore lock poisoned".into()))?;

        let secret = secrets.get(request.public_key).ok_or_else(|| {
            DidError::SigningFailure(format!(
                "no secret for public key {}",
                hex::encode(request.public_key)
            ))
        })?;

        if secret.algorithm() != request.algorithm {
            return Err(DidError::SigningFailure(format!(
                "key is {} but {} was requested",
                secret.algorithm(),
                request.algorithm
            )));
        }

        Ok(match secret {
            StoredSecret::Ed25519(keypair) => keypair.sign(request.data).as_bytes().to_vec(),
            StoredSecret::Ecdsa(key) => {
                let signature: EcdsaSignature = key.sign(request.data);
                signature.to_bytes().to_vec()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use didproof_core::{Ed25519PublicKey, Ed25519Signature};

    #[tokio::test]
    async fn test_ed25519_signing() {
        let keystore = MemoryKeystore::new();
        let public_key = keystore.generate_ed25519();

        let sig = keystore
            .sign(SignRequest {
                public_key: &public_key,
                algorithm: SignatureAlgorithm::Ed25519,
                data: b"payload",
            })
            .await
            .unwrap();

        let pk = Ed25519PublicKey::from_slice(&public_key).unwrap();
        let sig = Ed25519Signature::from_slice(&sig).unwrap();
        assert!(pk.verify(b"payload", &sig).is_ok());
    }

    #[tokio::test]
    async fn test_ecdsa_signing() {
        use k256::ecdsa::signature::Verifier;
        use k256::ecdsa::VerifyingKey;

        let keystore = MemoryKeystore::new();
        let public_key = keystore.generate_ecdsa();
        assert_eq!(public_key.len(), 33);

        let sig = keystore
            .sign(SignRequest {
                public_key: &public_key,
                algorithm: SignatureAlgorithm::EcdsaSecp256k1,
                data: b"payload",
            })
            .await
            .unwrap();

        let vk = VerifyingKey::from_sec1_bytes(&public_key).unwrap();
        let sig = EcdsaSignature::from_slice(&sig).unwrap();
        assert!(vk.verify(b"payload", &sig).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_key_and_wrong_algorithm() {
        let keystore = MemoryKeystore::new();
        let public_key = keystore.generate_ed25519();

        let missing = keystore
            .sign(SignRequest {
                public_key: &[1u8; 32],
                algorithm: SignatureAlgorithm::Ed25519,
                data: b"x",
            })
            .await;
        assert!(matches!(missing, Err(DidError::SigningFailure(_))));

        let wrong = keystore
            .sign(SignRequest {
                public_key: &public_key,
                algorithm: SignatureAlgorithm::Sr25519,
                data: b"x",
            })
            .await;
        assert!(matches!(wrong, Err(DidError::SigningFailure(_))));
    }

    #[test]
    fn test_seeded_ecdsa_is_deterministic() {
        let a = MemoryKeystore::new();
        let b = MemoryKeystore::new();
        let seed = [7u8; 32];
        assert_eq!(a.ecdsa_from_seed(&seed).unwrap(), b.ecdsa_from_seed(&seed).unwrap());
        assert!(a.ecdsa_from_seed(&[0u8; 32]).is_err());
        assert_eq!(a.len(), 1);
    }
}
