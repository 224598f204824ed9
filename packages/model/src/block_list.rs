//! # Block List
//!
//! The ordered block sequence of a page: a hero anchor, a reorderable middle
//! segment of dynamic blocks, and a menu anchor.
//!
//! Anchors live in dedicated slots, so the type itself guarantees there is
//! exactly one of each and that they sit first and last. Every operation in
//! this module touches only the dynamic segment, except `toggle_active` and
//! `replace_content` which address anchors by their fixed ids.
//!
//! Operations that address an id that is not there are no-ops; they report
//! what happened through their return value instead of failing.

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockKind, Content};
use crate::element::ElementTree;
use crate::error::{BlockListShapeError, InvariantViolation};
use crate::ids::{is_reserved_id, HERO_BLOCK_ID, MENU_BLOCK_ID};
use crate::reorder;
use crate::tree;

/// Ordered blocks of one page.
///
/// Serializes as a flat array `[hero, ...dynamic, menu]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct BlockList {
    hero: Block,
    dynamic: Vec<Block>,
    menu: Block,
}

/// What `set_cta_presence` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtaChange {
    Inserted(String),
    Removed(String),
    Unchanged,
}

impl BlockList {
    pub fn new(hero: Block, menu: Block) -> Self {
        Self {
            hero,
            dynamic: Vec::new(),
            menu,
        }
    }

    pub fn hero(&self) -> &Block {
        &self.hero
    }

    pub fn menu(&self) -> &Block {
        &self.menu
    }

    /// Middle segment, in order
    pub fn dynamic(&self) -> &[Block] {
        &self.dynamic
    }

    /// All blocks in page order
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        std::iter::once(&self.hero)
            .chain(self.dynamic.iter())
            .chain(std::iter::once(&self.menu))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        std::iter::once(&mut self.hero)
            .chain(self.dynamic.iter_mut())
            .chain(std::iter::once(&mut self.menu))
    }

    pub fn len(&self) -> usize {
        self.dynamic.len() + 2
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn dynamic_ids(&self) -> Vec<String> {
        tree::collect_ids(&self.dynamic)
    }

    pub fn find(&self, id: &str) -> Option<&Block> {
        match id {
            HERO_BLOCK_ID => Some(&self.hero),
            MENU_BLOCK_ID => Some(&self.menu),
            _ => tree::find_by_id(&self.dynamic, id),
        }
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Block> {
        match id {
            HERO_BLOCK_ID => Some(&mut self.hero),
            MENU_BLOCK_ID => Some(&mut self.menu),
            _ => tree::find_by_id_mut(&mut self.dynamic, id),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Append a block to the end of the dynamic segment
    pub fn insert_dynamic(&mut self, block: Block) -> Result<&Block, InvariantViolation> {
        self.check_insertable(&block)?;
        self.dynamic.push(block);
        Ok(&self.dynamic[self.dynamic.len() - 1])
    }

    /// Insert a block right after the hero anchor
    pub fn insert_dynamic_front(&mut self, block: Block) -> Result<&Block, InvariantViolation> {
        self.check_insertable(&block)?;
        self.dynamic.insert(0, block);
        Ok(&self.dynamic[0])
    }

    fn check_insertable(&self, block: &Block) -> Result<(), InvariantViolation> {
        if block.id.is_empty() {
            return Err(InvariantViolation::EmptyId);
        }
        if block.is_anchor() {
            return Err(InvariantViolation::MisplacedAnchor(block.id.clone()));
        }
        if is_reserved_id(&block.id) {
            return Err(InvariantViolation::ReservedId(block.id.clone()));
        }
        if tree::contains(&self.dynamic, &block.id) {
            return Err(InvariantViolation::DuplicateId(block.id.clone()));
        }
        Ok(())
    }

    /// Remove one dynamic block. Anchor and unknown ids are ignored.
    pub fn remove_dynamic(&mut self, id: &str) -> Option<Block> {
        if is_reserved_id(id) {
            return None;
        }
        tree::remove_by_id(&mut self.dynamic, id)
    }

    /// Set `is_active` on any block. Returns true if the flag changed.
    pub fn toggle_active(&mut self, id: &str, is_active: bool) -> bool {
        match self.find_mut(id) {
            Some(block) if block.is_active != is_active => {
                block.is_active = is_active;
                true
            }
            _ => false,
        }
    }

    /// The call-to-action block, if one exists
    pub fn cta(&self) -> Option<&Block> {
        self.dynamic.iter().find(|block| block.kind == BlockKind::Cta)
    }

    /// Make a cta block exist or not exist.
    ///
    /// `make` is invoked only when a new block is needed; the new block goes
    /// to the front of the dynamic segment.
    pub fn set_cta_presence(
        &mut self,
        enabled: bool,
        make: impl FnOnce() -> Block,
    ) -> Result<CtaChange, InvariantViolation> {
        match (enabled, self.cta().map(|block| block.id.clone())) {
            (true, Some(_)) | (false, None) => Ok(CtaChange::Unchanged),
            (true, None) => {
                let block = make();
                let id = block.id.clone();
                self.insert_dynamic_front(block)?;
                Ok(CtaChange::Inserted(id))
            }
            (false, Some(_)) => match self.remove_cta() {
                Some(removed) => Ok(CtaChange::Removed(removed.id)),
                None => Ok(CtaChange::Unchanged),
            },
        }
    }

    /// Remove the cta block, if any
    pub fn remove_cta(&mut self) -> Option<Block> {
        let pos = self
            .dynamic
            .iter()
            .position(|block| block.kind == BlockKind::Cta)?;
        Some(self.dynamic.remove(pos))
    }

    /// Move `source` onto `target` within the dynamic segment
    pub fn reorder_dynamic(&mut self, source: &str, target: &str) -> bool {
        reorder::move_onto(&mut self.dynamic, |block| block.id.as_str(), source, target)
    }

    /// Replace the whole content record of a block
    pub fn replace_content(&mut self, id: &str, content: Content) -> bool {
        match self.find_mut(id) {
            Some(block) if block.content != content => {
                block.content = content;
                true
            }
            _ => false,
        }
    }

    pub fn element_tree(&self, block_id: &str) -> Option<&ElementTree> {
        self.find(block_id)?.elements.as_ref()
    }

    pub fn element_tree_mut(&mut self, block_id: &str) -> Option<&mut ElementTree> {
        self.find_mut(block_id)?.elements.as_mut()
    }
}

impl TryFrom<Vec<Block>> for BlockList {
    type Error = BlockListShapeError;

    fn try_from(mut blocks: Vec<Block>) -> Result<Self, Self::Error> {
        if blocks.len() < 2 {
            return Err(BlockListShapeError(format!(
                "expected at least hero and menu blocks, found {} block(s)",
                blocks.len()
            )));
        }
        let menu = blocks.remove(blocks.len() - 1);
        let hero = blocks.remove(0);
        if hero.kind != BlockKind::Hero {
            return Err(BlockListShapeError(format!(
                "first block must be hero, found `{}`",
                hero.kind
            )));
        }
        if menu.kind != BlockKind::Menu {
            return Err(BlockListShapeError(format!(
                "last block must be menu, found `{}`",
                menu.kind
            )));
        }
        if let Some(anchor) = blocks.iter().find(|block| block.is_anchor()) {
            return Err(BlockListShapeError(format!(
                "anchor `{}` found in the middle of the block list",
                anchor.kind
            )));
        }
        Ok(Self {
            hero,
            dynamic: blocks,
            menu,
        })
    }
}

impl From<BlockList> for Vec<Block> {
    fn from(list: BlockList) -> Self {
        let mut blocks = Vec::with_capacity(list.dynamic.len() + 2);
        blocks.push(list.hero);
        blocks.extend(list.dynamic);
        blocks.push(list.menu);
        blocks
    }
}
