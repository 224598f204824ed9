//! Unsaved-change tracking
//!
//! Keeps the last committed document as an owned baseline and derives the
//! dirty flag by comparing the working document against it. The baseline is
//! only ever replaced by value, so edits to the working copy can never leak
//! into it.

use composer_model::Document;

#[derive(Debug, Clone)]
pub struct DirtyTracker {
    baseline: Document,
    dirty: bool,
}

impl DirtyTracker {
    /// Start clean against `baseline`
    pub fn new(baseline: Document) -> Self {
        Self {
            baseline,
            dirty: false,
        }
    }

    pub fn baseline(&self) -> &Document {
        &self.baseline
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute against `working`. Returns the new flag if it flipped.
    pub fn observe(&mut self, working: &Document) -> Option<bool> {
        let dirty = *working != self.baseline;
        if dirty == self.dirty {
            return None;
        }
        self.dirty = dirty;
        Some(dirty)
    }

    /// Replace the baseline after a commit, then recompute
    pub fn rebase(&mut self, committed: Document, working: &Document) -> Option<bool> {
        self.baseline = committed;
        self.observe(working)
    }

    /// Replace one block's element tree in the baseline, then recompute
    pub fn rebase_tree(
        &mut self,
        block_id: &str,
        tree: composer_model::ElementTree,
        working: &Document,
    ) -> Option<bool> {
        if let Some(block) = self.baseline.blocks.find_mut(block_id) {
            block.elements = Some(tree);
        }
        self.observe(working)
    }
}
