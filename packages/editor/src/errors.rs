//! Error types for the editor

use composer_model::{CatalogError, InvariantViolation};
use composer_store::{SaveError, StorageError};
use thiserror::Error;

use crate::mutations::MutationError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("Block {0} has no element tree")]
    NoElementTree(String),
}

impl EditorError {
    /// True for errors no retry or user action can fix
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            EditorError::Invariant(_)
                | EditorError::Mutation(MutationError::Invariant(_))
                | EditorError::Mutation(MutationError::InvalidStructure(_))
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, EditorError::Save(SaveError::Validation(_)))
    }
}
