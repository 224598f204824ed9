//! # Tree Algorithms
//!
//! Stateless recursive operations over ordered node trees, keyed by node id.
//!
//! The same functions serve the block list (a flat sequence; blocks have no
//! children) and element trees (arbitrarily nested). Every structural change
//! to either goes through here so no call site hand-rolls a recursive search.
//!
//! Each mutating operation comes in two forms: an in-place form over
//! `&mut Vec<N>` that reports what happened, and a pure form over `&[N]` that
//! returns a new tree and leaves the caller's copy untouched.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::block::Block;
use crate::element::Element;

/// A node addressable by id, optionally holding ordered children
pub trait TreeNode: Clone {
    fn node_id(&self) -> &str;

    fn child_nodes(&self) -> Option<&[Self]>;

    fn child_nodes_mut(&mut self) -> Option<&mut Vec<Self>>;

    /// The property record that `replace_props` merges into
    fn props_mut(&mut self) -> &mut Map<String, Value>;
}

impl TreeNode for Element {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn child_nodes(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn child_nodes_mut(&mut self) -> Option<&mut Vec<Self>> {
        self.children.as_mut()
    }

    fn props_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.props
    }
}

impl TreeNode for Block {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn child_nodes(&self) -> Option<&[Self]> {
        None
    }

    fn child_nodes_mut(&mut self) -> Option<&mut Vec<Self>> {
        None
    }

    fn props_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.content
    }
}

/// Position of a node: the id of its parent (`None` at root level) and its
/// index among its siblings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub parent: Option<String>,
    pub index: usize,
}

/// Depth-first search, returns the first match
pub fn find_by_id<'a, N: TreeNode>(tree: &'a [N], id: &str) -> Option<&'a N> {
    for node in tree {
        if node.node_id() == id {
            return Some(node);
        }
        if let Some(found) = node.child_nodes().and_then(|children| find_by_id(children, id)) {
            return Some(found);
        }
    }
    None
}

pub fn find_by_id_mut<'a, N: TreeNode>(tree: &'a mut [N], id: &str) -> Option<&'a mut N> {
    for node in tree.iter_mut() {
        if node.node_id() == id {
            return Some(node);
        }
        if let Some(found) = node
            .child_nodes_mut()
            .and_then(|children| find_by_id_mut(children, id))
        {
            return Some(found);
        }
    }
    None
}

pub fn contains<N: TreeNode>(tree: &[N], id: &str) -> bool {
    find_by_id(tree, id).is_some()
}

/// Find the parent and sibling index of a node
pub fn locate<N: TreeNode>(tree: &[N], id: &str) -> Option<Location> {
    locate_in(tree, id, None)
}

fn locate_in<N: TreeNode>(tree: &[N], id: &str, parent: Option<&str>) -> Option<Location> {
    for (index, node) in tree.iter().enumerate() {
        if node.node_id() == id {
            return Some(Location {
                parent: parent.map(str::to_string),
                index,
            });
        }
        if let Some(children) = node.child_nodes() {
            if let Some(found) = locate_in(children, id, Some(node.node_id())) {
                return Some(found);
            }
        }
    }
    None
}

/// Sibling list that holds the children of `parent`, or the root list
pub fn siblings_mut<'a, N: TreeNode>(
    tree: &'a mut Vec<N>,
    parent: Option<&str>,
) -> Option<&'a mut Vec<N>> {
    match parent {
        None => Some(tree),
        Some(parent_id) => find_by_id_mut(tree, parent_id)?.child_nodes_mut(),
    }
}

/// Remove the node with `id` and its whole subtree, wherever it is.
///
/// Returns the detached node so callers can inspect what went away (for
/// example to clear a selection that pointed into it). Unknown ids leave the
/// tree untouched and return `None`.
pub fn remove_by_id<N: TreeNode>(tree: &mut Vec<N>, id: &str) -> Option<N> {
    if let Some(pos) = tree.iter().position(|node| node.node_id() == id) {
        return Some(tree.remove(pos));
    }

    for node in tree.iter_mut() {
        if let Some(children) = node.child_nodes_mut() {
            if let Some(removed) = remove_by_id(children, id) {
                return Some(removed);
            }
        }
    }

    None
}

/// Pure form of [`remove_by_id`]
pub fn removed_by_id<N: TreeNode>(tree: &[N], id: &str) -> Vec<N> {
    let mut next = tree.to_vec();
    remove_by_id(&mut next, id);
    next
}

/// Shallow-merge `partial` into the props of the node with `id`.
///
/// Returns false when no node matched.
pub fn replace_props<N: TreeNode>(tree: &mut [N], id: &str, partial: &Map<String, Value>) -> bool {
    match find_by_id_mut(tree, id) {
        Some(node) => {
            merge_props(node.props_mut(), partial);
            true
        }
        None => false,
    }
}

/// Pure form of [`replace_props`]
pub fn with_props_replaced<N: TreeNode>(
    tree: &[N],
    id: &str,
    partial: &Map<String, Value>,
) -> Vec<N> {
    let mut next = tree.to_vec();
    replace_props(&mut next, id, partial);
    next
}

/// Shallow merge. A `null` in `partial` deletes that key.
pub fn merge_props(target: &mut Map<String, Value>, partial: &Map<String, Value>) {
    for (key, value) in partial {
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Ids in depth-first pre-order
pub fn collect_ids<N: TreeNode>(tree: &[N]) -> Vec<String> {
    let mut ids = Vec::new();
    walk(tree, &mut |node, _| ids.push(node.node_id().to_string()));
    ids
}

/// Id of `node` followed by the ids of all its descendants
pub fn subtree_ids<N: TreeNode>(node: &N) -> Vec<String> {
    collect_ids(std::slice::from_ref(node))
}

/// Visit every node depth-first with its depth (roots are depth 0)
pub fn walk<N: TreeNode>(tree: &[N], visit: &mut impl FnMut(&N, usize)) {
    walk_at(tree, 0, visit);
}

fn walk_at<N: TreeNode>(tree: &[N], depth: usize, visit: &mut impl FnMut(&N, usize)) {
    for node in tree {
        visit(node, depth);
        if let Some(children) = node.child_nodes() {
            walk_at(children, depth + 1, visit);
        }
    }
}

/// First id that occurs more than once anywhere in the tree
pub fn first_duplicate_id<N: TreeNode>(tree: &[N]) -> Option<String> {
    let mut seen = HashSet::new();
    collect_ids(tree).into_iter().find(|id| !seen.insert(id.clone()))
}

pub fn count_nodes<N: TreeNode>(tree: &[N]) -> usize {
    let mut count = 0;
    walk(tree, &mut |_, _| count += 1);
    count
}
