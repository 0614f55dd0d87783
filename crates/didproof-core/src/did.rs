//! DID string grammar.
//!
//! ```text
//! did:kilt:<identifier>[#fragment]          full DID
//! did:kilt:light:<identifier>[#fragment]    light DID
//! ```
//!
//! The identifier is exactly [`IDENTIFIER_LEN`] characters of the base-58
//! alphabet. Identifiers derived with [`identifier_from_public_key`] carry
//! a version byte and a 2-byte checksum that [`validate_did`] checks.

use crate::crypto::Blake3Hash;
use crate::error::CoreError;

/// Prefix of every DID handled by this crate.
pub const DID_PREFIX: &str = "did:kilt:";

/// Prefix of light (off-chain, key-derived) DIDs.
pub const LIGHT_DID_PREFIX: &str = "did:kilt:light:";

/// Length of the base-58 identifier token.
pub const IDENTIFIER_LEN: usize = 48;

/// Version byte prepended before base-58 encoding.
///
/// Any leading byte in `0x20..=0x3f` keeps a 35-byte payload at exactly 48
/// base-58 characters.
const IDENTIFIER_VERSION: u8 = 0x2a;

const CHECKSUM_LEN: usize = 2;

/// A parsed DID URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidUrl {
    /// The DID without fragment.
    pub did: String,
    /// The base-58 identifier token.
    pub identifier: String,
    /// Whether this is a light DID.
    pub light: bool,
    /// The part after `#`, if any.
    pub fragment: Option<String>,
}

/// Parse `did:kilt:[light:]<identifier>[#fragment]`.
///
/// Only the grammar is checked; use [`validate_did`] to also verify the
/// identifier checksum.
pub fn parse_did_url(input: &str) -> Result<DidUrl, CoreError> {
    let rest = input
        .strip_prefix(DID_PREFIX)
        .ok_or_else(|| CoreError::InvalidDid(format!("missing prefix: {}", input)))?;

    let (light, rest) = match rest.strip_prefix("light:") {
        Some(r) => (true, r),
        None => (false, rest),
    };

    let (identifier, fragment) = match rest.split_once('#') {
        Some((id, frag)) => {
            if frag.is_empty() {
                return Err(CoreError::InvalidDid(format!("empty fragment: {}", input)));
            }
            (id, Some(frag.to_string()))
        }
        None => (rest, None),
    };

    if identifier.len() != IDENTIFIER_LEN || !identifier.chars().all(is_base58_char) {
        return Err(CoreError::InvalidDid(format!("malformed identifier: {}", input)));
    }

    let did = if light {
        light_did(identifier)
    } else {
        full_did(identifier)
    };

    Ok(DidUrl {
        did,
        identifier: identifier.to_string(),
        light,
        fragment,
    })
}

/// Validate a DID string, including the identifier checksum.
///
/// With `allow_fragment == false` a trailing `#fragment` is rejected.
pub fn validate_did(input: &str, allow_fragment: bool) -> Result<DidUrl, CoreError> {
    let parsed = parse_did_url(input)?;
    if !allow_fragment && parsed.fragment.is_some() {
        return Err(CoreError::InvalidDid(format!(
            "expected DID without fragment, got {}",
            input
        )));
    }

    let raw = bs58::decode(&parsed.identifier)
        .into_vec()
        .map_err(|e| CoreError::InvalidDid(e.to_string()))?;
    if raw.len() != 1 + 32 + CHECKSUM_LEN || raw[0] != IDENTIFIER_VERSION {
        return Err(CoreError::InvalidDid(format!(
            "unknown identifier version: {}",
            parsed.identifier
        )));
    }
    let (body, checksum) = raw.split_at(1 + 32);
    if checksum != &identifier_checksum(body)[..] {
        return Err(CoreError::InvalidDid(format!(
            "identifier checksum mismatch: {}",
            parsed.identifier
        )));
    }

    Ok(parsed)
}

/// Derive the identifier token for a public key.
pub fn identifier_from_public_key(public_key: &[u8]) -> String {
    let mut raw = Vec::with_capacity(1 + 32 + CHECKSUM_LEN);
    raw.push(IDENTIFIER_VERSION);
    raw.extend_from_slice(Blake3Hash::hash(public_key).as_bytes());
    let checksum = identifier_checksum(&raw);
    raw.extend_from_slice(&checksum);
    bs58::encode(raw).into_string()
}

/// `did:kilt:<identifier>`
pub fn full_did(identifier: &str) -> String {
    format!("{}{}", DID_PREFIX, identifier)
}

/// `did:kilt:light:<identifier>`
pub fn light_did(identifier: &str) -> String {
    format!("{}{}", LIGHT_DID_PREFIX, identifier)
}

fn identifier_checksum(body: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Blake3Hash::hash_parts([b"didproof-identifier".as_slice(), body]);
    [digest.0[0], digest.0[1]]
}

fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}
