//! # Document
//!
//! The unit of load, save and dirty comparison: the block list of one page,
//! where blocks of element-hosting kinds carry their element tree and its
//! name/description metadata.
//!
//! Serialized shape:
//!
//! ```text
//! { "blocks": [ hero, ...dynamic, menu ] }
//!                 └─ block.elements: { name, description, elements: [ ...tree ] }
//! ```
//!
//! Equality is structural. Property bags are JSON maps, so key order never
//! affects comparison.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::block_list::BlockList;
use crate::catalog::BlockCatalog;
use crate::element::{Element, ElementTree};
use crate::tree;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: BlockList,
}

impl Document {
    /// Hero and menu anchors only, no dynamic blocks
    pub fn empty(catalog: &BlockCatalog) -> Self {
        Self {
            blocks: BlockList::new(catalog.hero(), catalog.menu()),
        }
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.find(id)
    }

    pub fn element_tree(&self, block_id: &str) -> Option<&ElementTree> {
        self.blocks.element_tree(block_id)
    }

    pub fn element_tree_mut(&mut self, block_id: &str) -> Option<&mut ElementTree> {
        self.blocks.element_tree_mut(block_id)
    }

    pub fn find_element(&self, block_id: &str, element_id: &str) -> Option<&Element> {
        tree::find_by_id(&self.element_tree(block_id)?.elements, element_id)
    }

    /// Ids of every block followed by every element, in document order
    pub fn all_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for block in self.blocks.iter() {
            ids.push(block.id.clone());
        }
        for block in self.blocks.iter() {
            if let Some(elements) = &block.elements {
                ids.extend(elements.ids());
            }
        }
        ids
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}
