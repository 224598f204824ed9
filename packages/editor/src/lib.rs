//! # Composer Editor
//!
//! Editing sessions for composed profile pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: blocks, elements, tree algorithms    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Apply mutations one at a time            │
//! │  - Undo/redo over document snapshots        │
//! │  - Dirty flag against the committed doc     │
//! │  - Selection and change notifications       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: validate, then commit atomically     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single writer**: Edits are synchronous and applied in issue order
//! 2. **Stale ids are no-ops**: Addressing a missing node changes nothing
//! 3. **Anchors are fixed**: Hero first, menu last, always exactly one each
//! 4. **Whole-document saves**: Nothing reaches storage without validating
//!
//! ## Usage
//!
//! ```rust,ignore
//! use composer_editor::{ComposerConfig, EditSession};
//! use composer_store::{FileStore, PersistenceGateway};
//! use std::sync::Arc;
//!
//! let config = ComposerConfig::load(".")?;
//! let store = FileStore::new(config.get_store_dir("."));
//! let gateway = PersistenceGateway::new(store, Arc::new(config.catalog()));
//!
//! let mut session = EditSession::open(&gateway, "profile", config.id_generator())
//!     .await?
//!     .with_history_levels(config.history_levels);
//!
//! let link = session.insert_dynamic("link")?;
//! session.set_cta_presence(true)?;
//! session.save(&gateway).await?;
//! ```

mod config;
mod dirty;
mod errors;
mod events;
mod mutations;
mod session;
mod undo_stack;

pub use config::{ComposerConfig, IdStrategy, DEFAULT_CONFIG_NAME};
pub use dirty::DirtyTracker;
pub use errors::EditorError;
pub use events::{ElementSelection, SessionEvent};
pub use mutations::{Mutation, MutationError, MutationOutcome};
pub use session::{EditSession, LeaveCheck, SaveTicket};
pub use undo_stack::{MutationBatch, UndoStack};
