//! Claims: property/value assertions tied to a claim type.

use std::collections::BTreeMap;

use didproof_core::Blake3Hash;
use serde::{Deserialize, Serialize};

/// Claim property values, keyed by property name.
pub type ClaimContents = BTreeMap<String, serde_json::Value>;

/// A set of property/value pairs about `owner`, shaped by the claim type
/// committed to in `ctype_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "cTypeHash")]
    pub ctype_hash: Blake3Hash,

    pub contents: ClaimContents,

    /// Subject DID. `None` once the owner has been hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Claim {
    pub fn new(ctype_hash: Blake3Hash, owner: impl Into<String>) -> Self {
        Self {
            ctype_hash,
            contents: ClaimContents::new(),
            owner: Some(owner.into()),
        }
    }

    /// Add a property.
    pub fn with(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.contents.insert(name.into(), value);
        self
    }

    pub fn with_contents(mut self, contents: ClaimContents) -> Self {
        self.contents = contents;
        self
    }
}
