//! Compressed wire form.
//!
//! ```text
//! request     = [claim, hashTree, claimOwner, signature, cTypeHash, rootHash, legitimations, delegationId]
//! claim       = [contents, cTypeHash, owner]
//! hashTree    = { property: [hash, nonce], ... }       sorted by property
//! nonceHash   = [hash, nonce] | [hash]
//! signature   = [keyId, signature]
//! attestation = [claimHash, cTypeHash, owner, revoked, delegationId]
//! credential  = [request, attestation]
//! ```
//!
//! Hashes, nonces and signatures are lowercase hex. An absent delegation id
//! is `null`. Only fully disclosed requests compress; a one-element
//! `nonceHash` is accepted on input and decodes to a hidden commitment.

use didproof_core::{Blake3Hash, Nonce};
use didproof_did::DidSignature;
use serde_json::{json, Map, Value};

use crate::attestation::{Attestation, AttestedClaim};
use crate::claim::{Claim, ClaimContents};
use crate::error::{CredentialError, Result};
use crate::nonce_hash::NonceHash;
use crate::request::{ClaimHashTree, RequestForAttestation};

const REQUEST_LEN: usize = 8;
const CLAIM_LEN: usize = 3;
const ATTESTATION_LEN: usize = 5;
const CREDENTIAL_LEN: usize = 2;

impl RequestForAttestation {
    /// Encode as the 8-element compressed form.
    ///
    /// Fails with [`CredentialError::Redacted`] if anything has been hidden.
    pub fn compress(&self) -> Result<Value> {
        self.check_shape()?;

        let owner = self
            .claim
            .owner
            .as_deref()
            .ok_or_else(|| redacted("claim.owner"))?;
        if let Some(name) = self
            .claim_hash_tree
            .keys()
            .find(|name| !self.claim.contents.contains_key(*name))
        {
            return Err(redacted(format!("claim.contents.{}", name)));
        }

        let mut tree = Map::new();
        for (name, leaf) in &self.claim_hash_tree {
            tree.insert(
                name.clone(),
                compress_nonce_hash(leaf, &format!("claimHashTree.{}", name))?,
            );
        }

        let legitimations = self
            .legitimations
            .iter()
            .map(AttestedClaim::compress)
            .collect::<Result<Vec<_>>>()?;

        Ok(json!([
            [
                Value::Object(contents_to_map(&self.claim.contents)),
                self.claim.ctype_hash.to_hex(),
                owner,
            ],
            Value::Object(tree),
            compress_nonce_hash(&self.claim_owner, "claimOwner")?,
            [
                self.claimer_signature.key_id,
                self.claimer_signature.signature
            ],
            compress_nonce_hash(&self.ctype_hash, "cTypeHash")?,
            self.root_hash.to_hex(),
            legitimations,
            optional_hash(self.delegation_id.as_ref()),
        ]))
    }

    /// Decode the 8-element compressed form.
    pub fn decompress(value: &Value) -> Result<Self> {
        let fields = fixed_array(value, REQUEST_LEN, "request")?;

        let claim = decompress_claim(&fields[0])?;

        let claim_hash_tree = fields[1]
            .as_object()
            .ok_or_else(|| format_err("claim hash tree is not an object"))?
            .iter()
            .map(|(name, leaf)| Ok((name.clone(), decompress_nonce_hash(leaf)?)))
            .collect::<Result<ClaimHashTree>>()?;

        let signature = fixed_array(&fields[3], 2, "claimer signature")?;
        let claimer_signature = DidSignature {
            key_id: string(&signature[0], "signature key id")?.to_string(),
            signature: string(&signature[1], "signature")?.to_string(),
        };

        let legitimations = fields[6]
            .as_array()
            .ok_or_else(|| format_err("legitimations is not an array"))?
            .iter()
            .map(AttestedClaim::decompress)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            claim,
            claim_hash_tree,
            claim_owner: decompress_nonce_hash(&fields[2])?,
            claimer_signature,
            ctype_hash: decompress_nonce_hash(&fields[4])?,
            root_hash: hash(&fields[5], "root hash")?,
            legitimations,
            delegation_id: decompress_optional_hash(&fields[7], "delegation id")?,
        })
    }
}

impl Attestation {
    /// `[claimHash, cTypeHash, owner, revoked, delegationId]`
    pub fn compress(&self) -> Value {
        json!([
            self.claim_hash.to_hex(),
            self.ctype_hash.to_hex(),
            self.owner,
            self.revoked,
            optional_hash(self.delegation_id.as_ref()),
        ])
    }

    pub fn decompress(value: &Value) -> Result<Self> {
        let fields = fixed_array(value, ATTESTATION_LEN, "attestation")?;
        Ok(Self {
            claim_hash: hash(&fields[0], "attestation claim hash")?,
            ctype_hash: hash(&fields[1], "attestation claim type hash")?,
            owner: string(&fields[2], "attestation owner")?.to_string(),
            revoked: fields[3]
                .as_bool()
                .ok_or_else(|| format_err("attestation revoked flag is not a bool"))?,
            delegation_id: decompress_optional_hash(&fields[4], "attestation delegation id")?,
        })
    }
}

impl AttestedClaim {
    /// `[compressedRequest, compressedAttestation]`
    pub fn compress(&self) -> Result<Value> {
        Ok(json!([self.request.compress()?, self.attestation.compress()]))
    }

    pub fn decompress(value: &Value) -> Result<Self> {
        let fields = fixed_array(value, CREDENTIAL_LEN, "attested claim")?;
        Ok(Self {
            request: RequestForAttestation::decompress(&fields[0])?,
            attestation: Attestation::decompress(&fields[1])?,
        })
    }
}

fn compress_nonce_hash(nonce_hash: &NonceHash, field: &str) -> Result<Value> {
    match nonce_hash {
        NonceHash::Disclosed { hash, nonce } => Ok(json!([hash.to_hex(), nonce.to_hex()])),
        NonceHash::Hidden { .. } => Err(redacted(field)),
    }
}

fn decompress_nonce_hash(value: &Value) -> Result<NonceHash> {
    let parts = value
        .as_array()
        .ok_or_else(|| format_err("nonce hash is not an array"))?;
    match parts.as_slice() {
        [h] => Ok(NonceHash::Hidden {
            hash: hash(h, "nonce hash")?,
        }),
        [h, n] => Ok(NonceHash::Disclosed {
            hash: hash(h, "nonce hash")?,
            nonce: Nonce::from_hex(string(n, "nonce")?)
                .map_err(|e| format_err(format!("nonce: {}", e)))?,
        }),
        _ => Err(format_err(format!(
            "nonce hash has {} elements, expected 1 or 2",
            parts.len()
        ))),
    }
}

fn decompress_claim(value: &Value) -> Result<Claim> {
    let fields = fixed_array(value, CLAIM_LEN, "claim")?;
    let contents = fields[0]
        .as_object()
        .ok_or_else(|| format_err("claim contents is not an object"))?
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect::<ClaimContents>();
    let owner = match &fields[2] {
        Value::Null => None,
        other => Some(string(other, "claim owner")?.to_string()),
    };
    Ok(Claim {
        ctype_hash: hash(&fields[1], "claim type hash")?,
        contents,
        owner,
    })
}

fn contents_to_map(contents: &ClaimContents) -> Map<String, Value> {
    contents
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn optional_hash(hash: Option<&Blake3Hash>) -> Value {
    hash.map_or(Value::Null, |h| Value::from(h.to_hex()))
}

fn decompress_optional_hash(value: &Value, what: &str) -> Result<Option<Blake3Hash>> {
    match value {
        Value::Null => Ok(None),
        other => hash(other, what).map(Some),
    }
}

fn fixed_array<'a>(value: &'a Value, len: usize, what: &str) -> Result<&'a [Value]> {
    match value.as_array() {
        Some(items) if items.len() == len => Ok(items),
        Some(items) => Err(format_err(format!(
            "{} has {} elements, expected {}",
            what,
            items.len(),
            len
        ))),
        None => Err(format_err(format!("{} is not an array", what))),
    }
}

fn string<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| format_err(format!("{} is not a string", what)))
}

fn hash(value: &Value, what: &str) -> Result<Blake3Hash> {
    Blake3Hash::from_hex(string(value, what)?).map_err(|e| format_err(format!("{}: {}", what, e)))
}

fn format_err(msg: impl Into<String>) -> CredentialError {
    CredentialError::Format(msg.into())
}

fn redacted(field: impl Into<String>) -> CredentialError {
    CredentialError::Redacted {
        field: field.into(),
    }
}
