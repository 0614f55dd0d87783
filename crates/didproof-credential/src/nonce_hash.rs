//! Salted commitments to single values.

use didproof_core::{commitment_hash, Blake3Hash, Nonce};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A salted commitment: `hash = Blake3(nonce || canonical(value))`.
///
/// A disclosed commitment carries the nonce so a verifier holding the value
/// can recompute the hash. A hidden one keeps only the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NonceHash {
    Disclosed { hash: Blake3Hash, nonce: Nonce },
    Hidden { hash: Blake3Hash },
}

impl NonceHash {
    /// Commit to `value` under a fresh nonce.
    pub fn commit(value: &serde_json::Value) -> Result<Self> {
        Self::commit_with_nonce(Nonce::generate(), value)
    }

    /// Commit to `value` under the given nonce.
    pub fn commit_with_nonce(nonce: Nonce, value: &serde_json::Value) -> Result<Self> {
        let hash = commitment_hash(&nonce, value)?;
        Ok(Self::Disclosed { hash, nonce })
    }

    pub fn hash(&self) -> &Blake3Hash {
        match self {
            Self::Disclosed { hash, .. } | Self::Hidden { hash } => hash,
        }
    }

    pub fn nonce(&self) -> Option<&Nonce> {
        match self {
            Self::Disclosed { nonce, .. } => Some(nonce),
            Self::Hidden { .. } => None,
        }
    }

    pub fn is_disclosed(&self) -> bool {
        matches!(self, Self::Disclosed { .. })
    }

    /// The same commitment with its nonce erased.
    pub fn hidden(&self) -> Self {
        Self::Hidden { hash: *self.hash() }
    }

    /// Recompute the hash from `value`.
    ///
    /// Hidden commitments cannot be recomputed and return `false`.
    pub fn matches(&self, value: &serde_json::Value) -> Result<bool> {
        match self {
            Self::Disclosed { hash, nonce } => Ok(commitment_hash(nonce, value)? == *hash),
            Self::Hidden { .. } => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_commit_and_match() {
        let c = NonceHash::commit(&json!("alice")).unwrap();
        assert!(c.is_disclosed());
        assert!(c.matches(&json!("alice")).unwrap());
        assert!(!c.matches(&json!("bob")).unwrap());
    }

    #[test]
    fn test_fresh_nonces_hide_equal_values() {
        let a = NonceHash::commit(&json!(42)).unwrap();
        let b = NonceHash::commit(&json!(42)).unwrap();
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_hidden_keeps_hash_drops_nonce() {
        let c = NonceHash::commit(&json!(true)).unwrap();
        let h = c.hidden();
        assert_eq!(h.hash(), c.hash());
        assert!(h.nonce().is_none());
        assert!(!h.matches(&json!(true)).unwrap());
    }

    #[test]
    fn test_untagged_json() {
        let c = NonceHash::commit_with_nonce(Nonce::from_bytes([1; 32]), &json!("x")).unwrap();
        let disclosed = serde_json::to_value(c).unwrap();
        assert!(disclosed.get("nonce").is_some());
        assert_eq!(serde_json::from_value::<NonceHash>(disclosed).unwrap(), c);

        let hidden = serde_json::to_value(c.hidden()).unwrap();
        assert!(hidden.get("nonce").is_none());
        assert_eq!(
            serde_json::from_value::<NonceHash>(hidden).unwrap(),
            c.hidden()
        );
    }

    proptest! {
        #[test]
        fn commitment_binds_value(a in ".{0,32}", b in ".{0,32}", seed in any::<[u8; 32]>()) {
            let c = NonceHash::commit_with_nonce(Nonce::from_bytes(seed), &json!(a)).unwrap();
            prop_assert!(c.matches(&json!(a)).unwrap());
            prop_assert_eq!(c.matches(&json!(b)).unwrap(), a == b);
        }
    }
}
