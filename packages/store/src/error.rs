//! Error types for document persistence

use composer_model::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document key: {0:?}")]
    InvalidKey(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored document {key} is unreadable: {message}")]
    Corrupt { key: String, message: String },
}

/// Why a save did not happen
#[derive(Error, Debug)]
pub enum SaveError {
    /// Rejected before anything was written
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Passed validation but could not be committed; prior state is intact
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    /// A tree save addressed a block the committed document does not have
    #[error("Block {0} is not in the committed document")]
    BlockNotCommitted(String),
}

impl SaveError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SaveError::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, SaveError::Storage(_))
    }
}
