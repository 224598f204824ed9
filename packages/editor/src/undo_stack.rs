//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each entry records the document before and after its mutations
//! - Undo restores the `before` snapshot and moves the entry to the redo stack
//! - Redo restores the `after` snapshot
//! - New mutations clear the redo stack
//! - Supports batched operations (group multiple mutations as one undo step)
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let before = doc.clone();
//! mutation.apply(&mut doc)?;
//! stack.record(mutation, before, doc.clone());
//!
//! if let Some(previous) = stack.undo() {
//!     doc = previous;
//! }
//! ```

use composer_model::Document;

use crate::Mutation;

/// A group of mutations that should be undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// Document before the first mutation
    pub before: Document,

    /// Document after the last mutation
    pub after: Document,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl MutationBatch {
    /// Create a single-mutation batch
    pub fn single(mutation: Mutation, before: Document, after: Document) -> Self {
        Self {
            mutations: vec![mutation],
            before,
            after,
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied mutations (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone mutations (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<OpenBatch>,
}

#[derive(Debug)]
struct OpenBatch {
    description: Option<String>,
    batch: Option<MutationBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record an applied mutation
    pub fn record(&mut self, mutation: Mutation, before: Document, after: Document) {
        if let Some(open) = &mut self.current_batch {
            match &mut open.batch {
                Some(batch) => {
                    batch.mutations.push(mutation);
                    batch.after = after;
                }
                None => open.batch = Some(MutationBatch::single(mutation, before, after)),
            }
            // Recording inside a batch still invalidates the redo future
            self.redo_stack.clear();
        } else {
            self.push_batch(MutationBatch::single(mutation, before, after));
        }
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        if self.current_batch.is_none() {
            self.current_batch = Some(OpenBatch {
                description: None,
                batch: None,
            });
        }
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(open) = self.current_batch.take() {
            if let Some(mut batch) = open.batch {
                batch.description = open.description;
                self.push_batch(batch);
            }
        }
    }

    pub fn in_batch(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(open) = &mut self.current_batch {
            open.description = Some(description.into());
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent batch; returns the document to restore
    pub fn undo(&mut self) -> Option<Document> {
        self.end_batch();
        let batch = self.undo_stack.pop()?;
        let restore = batch.before.clone();
        self.redo_stack.push(batch);
        Some(restore)
    }

    /// Redo the most recently undone batch; returns the document to restore
    pub fn redo(&mut self) -> Option<Document> {
        let batch = self.redo_stack.pop()?;
        let restore = batch.after.clone();
        self.undo_stack.push(batch);
        Some(restore)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
            || self
                .current_batch
                .as_ref()
                .is_some_and(|open| open.batch.is_some())
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
