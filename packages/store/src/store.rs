//! Storage seam for committed documents

use async_trait::async_trait;
use composer_model::Document;

use crate::error::StorageError;

/// Durable home of committed documents, keyed by block or template id.
///
/// `write` must be atomic: after it returns `Ok`, a `read` of the same key
/// sees the whole new document; after it returns `Err`, it still sees the
/// previous one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Last committed document, or `None` if nothing was ever written
    async fn read(&self, key: &str) -> Result<Option<Document>, StorageError>;

    async fn write(&self, key: &str, document: &Document) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    async fn read(&self, key: &str) -> Result<Option<Document>, StorageError> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, document: &Document) -> Result<(), StorageError> {
        (**self).write(key, document).await
    }
}

/// Keys become file names, so they are limited to a safe alphabet
pub fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("profile-42").is_ok());
        assert!(check_key("tpl_7.v2").is_ok());

        for bad in ["", ".", "..", "../etc", "a/b", "a\\b", "ключ"] {
            assert!(check_key(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
