//! # Composer Store
//!
//! Loading and committing composer documents.
//!
//! [`PersistenceGateway`] validates documents against the catalog and commits
//! them through a [`DocumentStore`]. Two stores ship with the crate:
//! [`MemoryStore`] for tests and embedding, and [`FileStore`] for one JSON
//! file per document.

mod error;
mod file;
mod gateway;
mod memory;
mod store;

pub use error::{SaveError, StorageError};
pub use file::FileStore;
pub use gateway::{PersistenceGateway, SaveReceipt};
pub use memory::MemoryStore;
pub use store::{check_key, DocumentStore};
