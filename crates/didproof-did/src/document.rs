//! DID documents: role-indexed keys, service endpoints and payload signing.
//!
//! [`DidDocument`] holds the validated data. The [`DidDetails`] trait is the
//! capability set shared by every DID variant; [`FullDidDetails`] and
//! [`LightDidDetails`] are its two implementations.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use didproof_core::{identifier_from_public_key, light_did, validate_did};
use serde::{Deserialize, Serialize};

use crate::endpoint::ServiceEndpoint;
use crate::error::{DidError, Result};
use crate::key::{DidKey, KeyRelationship, KeyType};
use crate::signer::{KeystoreSigner, SignRequest};

/// A signature produced by a DID key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidSignature {
    /// Fully qualified key id: `<did>#<local id>`.
    pub key_id: String,
    /// Hex-encoded signature bytes.
    pub signature: String,
}

impl DidSignature {
    /// Decode the hex signature.
    pub fn signature_bytes(&self) -> Result<Vec<u8>> {
        hex::decode(&self.signature).map_err(|e| DidError::Core(e.into()))
    }
}

/// Input to document construction.
#[derive(Debug, Clone, Default)]
pub struct DidCreationDetails {
    pub did: String,
    /// Keys in insertion order.
    pub keys: Vec<DidKey>,
    /// Role index: role -> ordered key ids.
    pub key_relationships: BTreeMap<KeyRelationship, Vec<String>>,
    pub service_endpoints: Vec<ServiceEndpoint>,
}

/// A validated DID document.
///
/// Invariants established at construction:
/// - key ids are unique and non-empty
/// - every id in the role index names an existing key, at most once per role
/// - at least one authentication key exists
/// - endpoint ids are unique and every endpoint is well formed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    did: String,
    keys: Vec<DidKey>,
    key_relationships: BTreeMap<KeyRelationship, Vec<String>>,
    service_endpoints: Vec<ServiceEndpoint>,
}

impl DidDocument {
    /// Validate creation details into a document.
    pub fn new(details: DidCreationDetails) -> Result<Self> {
        let DidCreationDetails {
            did,
            keys,
            key_relationships,
            service_endpoints,
        } = details;

        validate_did(&did, false).map_err(|e| DidError::Configuration(e.to_string()))?;

        let mut key_ids = HashSet::new();
        for key in &keys {
            if key.id.is_empty() {
                return Err(DidError::Configuration("key with empty id".into()));
            }
            if !key_ids.insert(key.id.as_str()) {
                return Err(DidError::Configuration(format!("duplicate key id {}", key.id)));
            }
        }

        for (role, ids) in &key_relationships {
            let mut seen = HashSet::new();
            for id in ids {
                if !key_ids.contains(id.as_str()) {
                    return Err(DidError::Configuration(format!(
                        "{:?} references unknown key {}",
                        role, id
                    )));
                }
                if !seen.insert(id.as_str()) {
                    return Err(DidError::Configuration(format!(
                        "{:?} lists key {} twice",
                        role, id
                    )));
                }
            }
        }

        let has_authentication = key_relationships
            .get(&KeyRelationship::Authentication)
            .map_or(false, |ids| !ids.is_empty());
        if !has_authentication {
            return Err(DidError::Configuration(format!(
                "{} has no authentication key",
                did
            )));
        }

        let mut endpoint_ids = HashSet::new();
        for endpoint in &service_endpoints {
            endpoint.validate()?;
            if !endpoint_ids.insert(endpoint.id.as_str()) {
                return Err(DidError::Configuration(format!(
                    "duplicate service endpoint id {}",
                    endpoint.id
                )));
            }
        }

        Ok(Self {
            did,
            keys,
            key_relationships,
            service_endpoints,
        })
    }

    /// The DID, without fragment.
    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn key(&self, id: &str) -> Option<&DidKey> {
        self.keys.iter().find(|k| k.id == id)
    }

    /// Keys of a role in role insertion order, or every key when `role` is
    /// `None`.
    pub fn keys(&self, role: Option<KeyRelationship>) -> Vec<&DidKey> {
        match role {
            None => self.keys.iter().collect(),
            Some(role) => self
                .key_relationships
                .get(&role)
                .map(|ids| ids.iter().filter_map(|id| self.key(id)).collect())
                .unwrap_or_default(),
        }
    }

    pub fn endpoint(&self, id: &str) -> Option<&ServiceEndpoint> {
        self.service_endpoints.iter().find(|e| e.id == id)
    }

    /// Endpoints carrying `ty` among their types, or all when `ty` is `None`.
    pub fn endpoints(&self, ty: Option<&str>) -> Vec<&ServiceEndpoint> {
        self.service_endpoints
            .iter()
            .filter(|e| ty.map_or(true, |t| e.has_type(t)))
            .collect()
    }
}

/// The capability set every DID variant exposes.
#[async_trait]
pub trait DidDetails: Send + Sync + fmt::Debug {
    /// The underlying validated document.
    fn document(&self) -> &DidDocument;

    /// The base-58 identifier token.
    fn identifier(&self) -> &str;

    fn did(&self) -> &str {
        self.document().did()
    }

    fn get_key(&self, id: &str) -> Option<&DidKey> {
        self.document().key(id)
    }

    fn get_keys(&self, role: Option<KeyRelationship>) -> Vec<&DidKey> {
        self.document().keys(role)
    }

    /// First authentication key.
    ///
    /// Construction guarantees one exists; the error path only fires for
    /// documents built around that check.
    fn authentication_key(&self) -> Result<&DidKey> {
        self.get_keys(Some(KeyRelationship::Authentication))
            .into_iter()
            .next()
            .ok_or_else(|| {
                DidError::Configuration(format!("{} has no authentication key", self.did()))
            })
    }

    fn encryption_key(&self) -> Option<&DidKey> {
        self.get_keys(Some(KeyRelationship::KeyAgreement))
            .into_iter()
            .next()
    }

    fn attestation_key(&self) -> Option<&DidKey> {
        self.get_keys(Some(KeyRelationship::AssertionMethod))
            .into_iter()
            .next()
    }

    fn delegation_key(&self) -> Option<&DidKey> {
        self.get_keys(Some(KeyRelationship::CapabilityDelegation))
            .into_iter()
            .next()
    }

    fn get_endpoint(&self, id: &str) -> Option<&ServiceEndpoint> {
        self.document().endpoint(id)
    }

    fn get_endpoints(&self, ty: Option<&str>) -> Vec<&ServiceEndpoint> {
        self.document().endpoints(ty)
    }

    /// `<did>#<local_id>`
    fn assemble_key_id(&self, local_id: &str) -> String {
        format!("{}#{}", self.did(), local_id)
    }

    /// Sign `payload` with the key `key_id` through `signer`.
    async fn sign_payload(
        &self,
        payload: &[u8],
        key_id: &str,
        signer: &dyn KeystoreSigner,
    ) -> Result<DidSignature> {
        let key = self.get_key(key_id).ok_or_else(|| DidError::KeyNotFound {
            did: self.did().to_string(),
            key_id: key_id.to_string(),
        })?;
        let algorithm = key
            .key_type
            .signature_algorithm()
            .ok_or(DidError::UnsupportedKeyType(key.key_type))?;

        let signature = signer
            .sign(SignRequest {
                public_key: &key.public_key,
                algorithm,
                data: payload,
            })
            .await?;

        Ok(DidSignature {
            key_id: self.assemble_key_id(&key.id),
            signature: hex::encode(signature),
        })
    }
}

/// A ledger-anchored DID with arbitrary keys, roles and endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullDidDetails {
    identifier: String,
    document: DidDocument,
}

impl FullDidDetails {
    pub fn new(details: DidCreationDetails) -> Result<Self> {
        let parsed =
            validate_did(&details.did, false).map_err(|e| DidError::Configuration(e.to_string()))?;
        if parsed.light {
            return Err(DidError::Configuration(format!(
                "{} is a light DID",
                details.did
            )));
        }
        Ok(Self {
            identifier: parsed.identifier,
            document: DidDocument::new(details)?,
        })
    }
}

impl DidDetails for FullDidDetails {
    fn document(&self) -> &DidDocument {
        &self.document
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Key material for a light DID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLightDidKey {
    pub key_type: KeyType,
    pub public_key: Vec<u8>,
}

/// An off-chain DID whose identifier is derived from its authentication key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightDidDetails {
    identifier: String,
    document: DidDocument,
}

impl LightDidDetails {
    /// Local id of the authentication key.
    pub const AUTHENTICATION_KEY_ID: &'static str = "authentication";
    /// Local id of the encryption key.
    pub const ENCRYPTION_KEY_ID: &'static str = "encryption";

    pub fn new(authentication: NewLightDidKey, encryption: Option<NewLightDidKey>) -> Result<Self> {
        if !authentication.key_type.is_signing() {
            return Err(DidError::Configuration(format!(
                "light DID authentication key cannot be {}",
                authentication.key_type
            )));
        }

        let identifier = identifier_from_public_key(&authentication.public_key);
        let did = light_did(&identifier);

        let mut keys = vec![DidKey::new(
            Self::AUTHENTICATION_KEY_ID,
            authentication.key_type,
            authentication.public_key,
        )
        .with_controller(did.clone())];
        let mut key_relationships = BTreeMap::new();
        key_relationships.insert(
            KeyRelationship::Authentication,
            vec![Self::AUTHENTICATION_KEY_ID.to_string()],
        );

        if let Some(encryption) = encryption {
            if encryption.key_type != KeyType::X25519 {
                return Err(DidError::Configuration(format!(
                    "light DID encryption key cannot be {}",
                    encryption.key_type
                )));
            }
            keys.push(
                DidKey::new(
                    Self::ENCRYPTION_KEY_ID,
                    encryption.key_type,
                    encryption.public_key,
                )
                .with_controller(did.clone()),
            );
            key_relationships.insert(
                KeyRelationship::KeyAgreement,
                vec![Self::ENCRYPTION_KEY_ID.to_string()],
            );
        }

        let document = DidDocument::new(DidCreationDetails {
            did,
            keys,
            key_relationships,
            service_endpoints: Vec::new(),
        })?;

        Ok(Self {
            identifier,
            document,
        })
    }
}

impl DidDetails for LightDidDetails {
    fn document(&self) -> &DidDocument {
        &self.document
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
