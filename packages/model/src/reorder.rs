//! # Drag Reorder
//!
//! Turns a drag gesture (dragged id, dropped-on id) into an index move within
//! one ordered sequence. The dragged item lands on the dropped-on item's
//! former index; everything in between shifts by one.
//!
//! A gesture whose ids are missing from the sequence, resolve to the same
//! index, or (for trees) live under different parents is rejected as a no-op.

use serde::{Deserialize, Serialize};

use crate::tree::{self, TreeNode};

/// A completed drag: `source` was dropped onto `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragGesture {
    pub source: String,
    pub target: String,
}

impl DragGesture {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Index move inside one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderPlan {
    pub from: usize,
    pub to: usize,
}

/// Plan moving `source` onto `target` inside `items`
pub fn plan<T>(
    items: &[T],
    key: impl Fn(&T) -> &str,
    source: &str,
    target: &str,
) -> Option<ReorderPlan> {
    let from = items.iter().position(|item| key(item) == source)?;
    let to = items.iter().position(|item| key(item) == target)?;
    (from != to).then_some(ReorderPlan { from, to })
}

/// Stable move: remove at `from`, insert at `to`
pub fn apply<T>(items: &mut Vec<T>, plan: ReorderPlan) {
    let item = items.remove(plan.from);
    items.insert(plan.to, item);
}

/// Move `source` onto `target` in `items`. Returns whether anything moved.
pub fn move_onto<T>(
    items: &mut Vec<T>,
    key: impl Fn(&T) -> &str,
    source: &str,
    target: &str,
) -> bool {
    match plan(items, key, source, target) {
        Some(plan) => {
            apply(items, plan);
            true
        }
        None => false,
    }
}

/// New ordering of an id sequence after the gesture
pub fn reordered_ids(ids: &[String], gesture: &DragGesture) -> Vec<String> {
    let mut next = ids.to_vec();
    move_onto(&mut next, |id| id.as_str(), &gesture.source, &gesture.target);
    next
}

/// Move a node onto a sibling inside a tree.
///
/// Both nodes must share the same parent (or both be roots). Cross-parent
/// gestures are rejected and leave the tree untouched.
pub fn move_sibling<N: TreeNode>(tree: &mut Vec<N>, source: &str, target: &str) -> bool {
    let (Some(from), Some(to)) = (tree::locate(tree, source), tree::locate(tree, target)) else {
        return false;
    };
    if from.parent != to.parent {
        tracing::debug!(
            "[Reorder] Rejected cross-parent drag: {} ({:?}) onto {} ({:?})",
            source,
            from.parent,
            target,
            to.parent
        );
        return false;
    }
    if from.index == to.index {
        return false;
    }
    match tree::siblings_mut(tree, from.parent.as_deref()) {
        Some(siblings) => {
            apply(siblings, ReorderPlan { from: from.index, to: to.index });
            true
        }
        None => false,
    }
}

/// Tracks an in-progress drag until it is dropped or cancelled
#[derive(Debug, Clone, Default)]
pub struct DragController {
    dragging: Option<String>,
    over: Option<String>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, source: impl Into<String>) {
        self.dragging = Some(source.into());
        self.over = None;
    }

    /// Record the item currently under the pointer
    pub fn hover(&mut self, target: impl Into<String>) {
        if self.dragging.is_some() {
            self.over = Some(target.into());
        }
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.over.as_deref()
    }

    /// Finish the drag on `target`, or on the last hovered item
    pub fn drop_on(&mut self, target: Option<&str>) -> Option<DragGesture> {
        let source = self.dragging.take()?;
        let hovered = self.over.take();
        let target = target.map(str::to_string).or(hovered)?;
        (source != target).then(|| DragGesture { source, target })
    }

    pub fn cancel(&mut self) {
        self.dragging = None;
        self.over = None;
    }
}
