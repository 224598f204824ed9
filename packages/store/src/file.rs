//! File-backed document store
//!
//! One pretty-printed JSON file per key under a root directory. Commits write
//! a temporary sibling file and rename it over the target, so a crash or a
//! failed write never leaves a half-written document behind.

use async_trait::async_trait;
use composer_model::Document;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{check_key, DocumentStore};

#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        check_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<Document>, StorageError> {
        let path = self.path_for(key)?;
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Document::from_json(&source)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    async fn write(&self, key: &str, document: &Document) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let source = document.to_json()?;

        tokio::fs::create_dir_all(&self.root).await?;

        // Unique per write, so stores sharing a root never share a temp file
        let tmp = self.root.join(format!(".{key}.json.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = write_synced(&tmp, source.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!("[FileStore] Committed {} ({} bytes)", path.display(), source.len());
        Ok(())
    }
}

/// Write `bytes` and flush them to disk before returning
async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
