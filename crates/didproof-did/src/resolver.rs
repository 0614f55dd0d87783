//! DID resolution seam.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::document::DidDetails;
use crate::error::{DidError, Result};

/// Async resolution capability: `resolve(did) -> document?`.
///
/// `Ok(None)` means the DID is unknown. Transport or backend failures are
/// reported as [`DidError::ResolutionFailure`].
#[async_trait]
pub trait DidResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<Option<Arc<dyn DidDetails>>>;
}

/// Resolver backed by an in-memory map.
#[derive(Default)]
pub struct MemoryResolver {
    documents: RwLock<HashMap<String, Arc<dyn DidDetails>>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under its own DID, replacing any previous one.
    pub fn insert(&self, document: Arc<dyn DidDetails>) {
        let mut documents = self.documents.write().unwrap_or_else(|e| e.into_inner());
        documents.insert(document.did().to_string(), document);
    }

    pub fn remove(&self, did: &str) -> Option<Arc<dyn DidDetails>> {
        let mut documents = self.documents.write().unwrap_or_else(|e| e.into_inner());
        documents.remove(did)
    }
}

#[async_trait]
impl DidResolver for MemoryResolver {
    async fn resolve(&self, did: &str) -> Result<Option<Arc<dyn DidDetails>>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| DidError::ResolutionFailure("resolver lock poisoned".into()))?;
        Ok(documents.get(did).cloned())
    }
}
