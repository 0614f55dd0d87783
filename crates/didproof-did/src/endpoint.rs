//! Service endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{DidError, Result};

const ALLOWED_URL_SCHEMES: [&str; 3] = ["http", "ftp", "ipfs"];

/// A service endpoint published on a DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    pub id: String,
    pub types: Vec<String>,
    pub urls: Vec<String>,
}

impl ServiceEndpoint {
    pub fn new(id: impl Into<String>, types: Vec<String>, urls: Vec<String>) -> Self {
        Self {
            id: id.into(),
            types,
            urls,
        }
    }

    /// Whether `ty` is one of this endpoint's type tags.
    pub fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }

    /// Check that the endpoint is well formed.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(DidError::Configuration("service endpoint with empty id".into()));
        }
        if self.types.is_empty() {
            return Err(DidError::Configuration(format!(
                "service endpoint {} has no type",
                self.id
            )));
        }
        if self.urls.is_empty() {
            return Err(DidError::Configuration(format!(
                "service endpoint {} has no URL",
                self.id
            )));
        }
        if let Some(url) = self
            .urls
            .iter()
            .find(|u| !ALLOWED_URL_SCHEMES.iter().any(|s| u.starts_with(s)))
        {
            return Err(DidError::Configuration(format!(
                "service endpoint {} has unsupported URL {}",
                self.id, url
            )));
        }
        Ok(())
    }
}
