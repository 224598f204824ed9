//! # Persistence Gateway
//!
//! The single path by which documents reach durable storage.
//!
//! ```text
//! save(key, doc) ── validate ──✗──▶ SaveError::Validation   (nothing written)
//!                      │
//!                      ✓
//!                      ▼
//!               store.write ──✗──▶ SaveError::Storage      (prior commit intact)
//!                      │
//!                      ✓
//!                      ▼
//!                 SaveReceipt                              (whole doc visible)
//! ```
//!
//! There is no field-level save. The unit is the whole document, or for
//! [`PersistenceGateway::save_tree`] one whole element tree with its
//! metadata, which is spliced into the committed document and committed as a
//! whole.

use chrono::{DateTime, Utc};
use composer_model::{schema, BlockCatalog, Document, ElementTree};
use std::sync::Arc;

use crate::error::{SaveError, StorageError};
use crate::store::DocumentStore;

/// Proof of a successful commit
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReceipt {
    pub key: String,
    pub saved_at: DateTime<Utc>,
}

pub struct PersistenceGateway<S> {
    store: S,
    catalog: Arc<BlockCatalog>,
}

impl<S: DocumentStore> PersistenceGateway<S> {
    pub fn new(store: S, catalog: Arc<BlockCatalog>) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn shared_catalog(&self) -> Arc<BlockCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Last committed document, or an anchors-only document if none exists
    pub async fn load(&self, key: &str) -> Result<Document, StorageError> {
        match self.store.read(key).await? {
            Some(document) => {
                if let Err(e) = schema::validate_document(&document, &self.catalog) {
                    // Still editable; the next save reports the same issues
                    tracing::warn!("[Load] Committed document {} no longer validates: {}", key, e);
                }
                Ok(document)
            }
            None => {
                tracing::debug!("[Load] No committed document for {}, starting empty", key);
                Ok(Document::empty(&self.catalog))
            }
        }
    }

    /// Validate and commit a whole document
    pub async fn save(&self, key: &str, document: &Document) -> Result<SaveReceipt, SaveError> {
        if let Err(e) = schema::validate_document(document, &self.catalog) {
            tracing::warn!("[Save] Rejected {}: {}", key, e);
            return Err(e.into());
        }
        self.commit(key, document).await
    }

    /// Replace one block's element tree in the committed document.
    ///
    /// Fails with [`SaveError::BlockNotCommitted`] when the committed document
    /// has no block `block_id`; nothing is written in that case.
    pub async fn save_tree(
        &self,
        key: &str,
        block_id: &str,
        tree: &ElementTree,
    ) -> Result<SaveReceipt, SaveError> {
        let mut document = self.load(key).await?;

        let Some(slot) = document.blocks.find_mut(block_id) else {
            tracing::debug!("[SaveTree] {} has no committed block {}", key, block_id);
            return Err(SaveError::BlockNotCommitted(block_id.to_string()));
        };
        slot.elements = Some(tree.clone());

        self.save(key, &document).await
    }

    async fn commit(&self, key: &str, document: &Document) -> Result<SaveReceipt, SaveError> {
        match self.store.write(key, document).await {
            Ok(()) => {
                tracing::info!(
                    "[Save] Committed {} ({} blocks)",
                    key,
                    document.blocks.len()
                );
                Ok(SaveReceipt {
                    key: key.to_string(),
                    saved_at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::warn!("[Save] Storage failed for {}: {}", key, e);
                Err(e.into())
            }
        }
    }
}
