//! Editing operations on one block's element tree

use crate::element::{Element, ElementTree, Props};
use crate::error::InvariantViolation;
use crate::reorder;
use crate::tree;

impl ElementTree {
    pub fn find(&self, id: &str) -> Option<&Element> {
        tree::find_by_id(&self.elements, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        tree::contains(&self.elements, id)
    }

    /// Every element id, depth-first
    pub fn ids(&self) -> Vec<String> {
        tree::collect_ids(&self.elements)
    }

    pub fn len(&self) -> usize {
        tree::count_nodes(&self.elements)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append `element` as a new root-level sibling.
    ///
    /// Fails if any id in the new subtree is already used in this tree.
    pub fn add_element(&mut self, element: Element) -> Result<&Element, InvariantViolation> {
        for id in tree::subtree_ids(&element) {
            if id.is_empty() {
                return Err(InvariantViolation::EmptyId);
            }
            if self.contains(&id) {
                return Err(InvariantViolation::DuplicateId(id));
            }
        }
        if let Some(duplicate) = tree::first_duplicate_id(std::slice::from_ref(&element)) {
            return Err(InvariantViolation::DuplicateId(duplicate));
        }
        self.elements.push(element);
        Ok(&self.elements[self.elements.len() - 1])
    }

    /// Shallow-merge props into the element with `id`
    pub fn update_props(&mut self, id: &str, partial: &Props) -> bool {
        let Some(element) = tree::find_by_id(&self.elements, id) else {
            return false;
        };
        let mut merged = element.props.clone();
        tree::merge_props(&mut merged, partial);
        if merged == element.props {
            return false;
        }
        tree::replace_props(&mut self.elements, id, partial)
    }

    /// Remove the element with `id` and its descendants, at any depth
    pub fn delete(&mut self, id: &str) -> Option<Element> {
        tree::remove_by_id(&mut self.elements, id)
    }

    /// Move `source` onto `target`; both must share a parent
    pub fn reorder(&mut self, source: &str, target: &str) -> bool {
        reorder::move_sibling(&mut self.elements, source, target)
    }

    /// Replace name and description. Returns true if either changed.
    pub fn set_metadata(&mut self, name: &str, description: &str) -> bool {
        if self.name == name && self.description == description {
            return false;
        }
        self.name = name.to_string();
        self.description = description.to_string();
        true
    }
}
