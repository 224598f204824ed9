//! In-memory document store

use async_trait::async_trait;
use composer_model::Document;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::DocumentStore;

/// Shared map of committed documents.
///
/// Clones share the same map. A write replaces the whole document under the
/// write lock, so readers never observe a partial commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an already-committed document
    pub fn with_document(key: impl Into<String>, document: Document) -> Self {
        let mut documents = HashMap::new();
        documents.insert(key.into(), document);
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<Document>, StorageError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, document: &Document) -> Result<(), StorageError> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), document.clone());
        Ok(())
    }
}
