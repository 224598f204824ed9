//! # Document Mutations
//!
//! The command set of the editor as plain, serializable values.
//!
//! ## Design Principles
//!
//! 1. **Self-contained**: Mutations that create nodes carry the node, already
//!    built by the catalog or element factory. Applying a mutation never
//!    generates ids.
//! 2. **Stale ids are no-ops**: Addressing a block or element that is not
//!    there yields [`MutationOutcome::Unchanged`], not an error. The UI may
//!    race a stale id against a local removal.
//! 3. **Check, then write**: A mutation that fails leaves the document as it
//!    was.
//!
//! ## Mutation Semantics
//!
//! ### Blocks
//! - Insert appends to the dynamic segment; a second cta is ignored
//! - Remove never touches anchors
//! - Cta presence inserts at the front of the dynamic segment or removes
//! - Reorder moves within the dynamic segment only
//!
//! ### Elements
//! - Add appends at the root level of the block's tree
//! - Delete removes the element with all descendants, at any depth
//! - Reorder moves among siblings; cross-parent moves are ignored

use composer_model::{
    Block, BlockKind, Content, CtaChange, Document, Element, ElementTree, InvariantViolation,
    Props,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Append a block to the dynamic segment
    #[serde(rename_all = "camelCase")]
    InsertBlock { block: Block },

    #[serde(rename_all = "camelCase")]
    RemoveBlock { block_id: String },

    #[serde(rename_all = "camelCase")]
    SetBlockActive { block_id: String, is_active: bool },

    /// `block` is the cta to insert when enabling and none exists yet
    #[serde(rename_all = "camelCase")]
    SetCtaPresence { enabled: bool, block: Option<Block> },

    #[serde(rename_all = "camelCase")]
    ReorderBlocks { source_id: String, target_id: String },

    /// Replace a block's whole content record
    #[serde(rename_all = "camelCase")]
    UpdateBlockContent { block_id: String, content: Content },

    #[serde(rename_all = "camelCase")]
    AddElement { block_id: String, element: Element },

    /// Shallow-merge into an element's props; `null` removes a key
    #[serde(rename_all = "camelCase")]
    UpdateElementProps {
        block_id: String,
        element_id: String,
        props: Props,
    },

    #[serde(rename_all = "camelCase")]
    DeleteElement { block_id: String, element_id: String },

    #[serde(rename_all = "camelCase")]
    ReorderElements {
        block_id: String,
        source_id: String,
        target_id: String,
    },

    #[serde(rename_all = "camelCase")]
    SetTreeMetadata {
        block_id: String,
        name: String,
        description: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// Whether applying a mutation changed the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Changed,
    Unchanged,
}

impl MutationOutcome {
    pub fn changed(self) -> bool {
        self == MutationOutcome::Changed
    }
}

impl From<bool> for MutationOutcome {
    fn from(changed: bool) -> Self {
        if changed {
            MutationOutcome::Changed
        } else {
            MutationOutcome::Unchanged
        }
    }
}

impl Mutation {
    /// Debug name of the mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "InsertBlock",
            Mutation::RemoveBlock { .. } => "RemoveBlock",
            Mutation::SetBlockActive { .. } => "SetBlockActive",
            Mutation::SetCtaPresence { .. } => "SetCtaPresence",
            Mutation::ReorderBlocks { .. } => "ReorderBlocks",
            Mutation::UpdateBlockContent { .. } => "UpdateBlockContent",
            Mutation::AddElement { .. } => "AddElement",
            Mutation::UpdateElementProps { .. } => "UpdateElementProps",
            Mutation::DeleteElement { .. } => "DeleteElement",
            Mutation::ReorderElements { .. } => "ReorderElements",
            Mutation::SetTreeMetadata { .. } => "SetTreeMetadata",
        }
    }

    /// Apply to the document
    pub fn apply(&self, doc: &mut Document) -> Result<MutationOutcome, MutationError> {
        let outcome = match self {
            Mutation::InsertBlock { block } => Self::apply_insert_block(doc, block)?,

            Mutation::RemoveBlock { block_id } => {
                doc.blocks.remove_dynamic(block_id).is_some().into()
            }

            Mutation::SetBlockActive { block_id, is_active } => {
                doc.blocks.toggle_active(block_id, *is_active).into()
            }

            Mutation::SetCtaPresence { enabled, block } => {
                Self::apply_cta_presence(doc, *enabled, block.as_ref())?
            }

            Mutation::ReorderBlocks { source_id, target_id } => {
                doc.blocks.reorder_dynamic(source_id, target_id).into()
            }

            Mutation::UpdateBlockContent { block_id, content } => {
                doc.blocks.replace_content(block_id, content.clone()).into()
            }

            Mutation::AddElement { block_id, element } => match doc.element_tree_mut(block_id) {
                Some(tree) => {
                    tree.add_element(element.clone())?;
                    MutationOutcome::Changed
                }
                None => MutationOutcome::Unchanged,
            },

            Mutation::UpdateElementProps {
                block_id,
                element_id,
                props,
            } => Self::with_tree(doc, block_id, |tree| tree.update_props(element_id, props)),

            Mutation::DeleteElement {
                block_id,
                element_id,
            } => Self::with_tree(doc, block_id, |tree| tree.delete(element_id).is_some()),

            Mutation::ReorderElements {
                block_id,
                source_id,
                target_id,
            } => Self::with_tree(doc, block_id, |tree| tree.reorder(source_id, target_id)),

            Mutation::SetTreeMetadata {
                block_id,
                name,
                description,
            } => Self::with_tree(doc, block_id, |tree| tree.set_metadata(name, description)),
        };

        if outcome == MutationOutcome::Unchanged {
            tracing::debug!("[{}] No change: {:?}", self.name(), self.target_ids());
        }
        Ok(outcome)
    }

    fn apply_insert_block(doc: &mut Document, block: &Block) -> Result<MutationOutcome, MutationError> {
        if block.kind == BlockKind::Cta && doc.blocks.cta().is_some() {
            return Ok(MutationOutcome::Unchanged);
        }
        doc.blocks.insert_dynamic(block.clone())?;
        Ok(MutationOutcome::Changed)
    }

    fn apply_cta_presence(
        doc: &mut Document,
        enabled: bool,
        block: Option<&Block>,
    ) -> Result<MutationOutcome, MutationError> {
        if !enabled {
            return Ok(doc.blocks.remove_cta().is_some().into());
        }
        if doc.blocks.cta().is_some() {
            return Ok(MutationOutcome::Unchanged);
        }
        match block {
            Some(block) if block.kind == BlockKind::Cta => {
                let change = doc.blocks.set_cta_presence(true, || block.clone())?;
                Ok((change != CtaChange::Unchanged).into())
            }
            Some(block) => Err(MutationError::InvalidStructure(format!(
                "expected a cta block, got `{}`",
                block.kind
            ))),
            None => Err(MutationError::InvalidStructure(
                "enabling cta requires a block to insert".to_string(),
            )),
        }
    }

    fn with_tree(
        doc: &mut Document,
        block_id: &str,
        edit: impl FnOnce(&mut ElementTree) -> bool,
    ) -> MutationOutcome {
        doc.element_tree_mut(block_id).map(edit).unwrap_or(false).into()
    }

    /// Ids this mutation addresses, for logging
    fn target_ids(&self) -> Vec<&str> {
        match self {
            Mutation::InsertBlock { block } => vec![block.id.as_str()],
            Mutation::RemoveBlock { block_id }
            | Mutation::SetBlockActive { block_id, .. }
            | Mutation::UpdateBlockContent { block_id, .. }
            | Mutation::SetTreeMetadata { block_id, .. } => vec![block_id.as_str()],
            Mutation::SetCtaPresence { block, .. } => {
                block.iter().map(|b| b.id.as_str()).collect()
            }
            Mutation::ReorderBlocks {
                source_id,
                target_id,
            } => vec![source_id.as_str(), target_id.as_str()],
            Mutation::AddElement { block_id, element } => {
                vec![block_id.as_str(), element.id.as_str()]
            }
            Mutation::UpdateElementProps {
                block_id,
                element_id,
                ..
            }
            | Mutation::DeleteElement {
                block_id,
                element_id,
            } => vec![block_id.as_str(), element_id.as_str()],
            Mutation::ReorderElements {
                block_id,
                source_id,
                target_id,
            } => vec![block_id.as_str(), source_id.as_str(), target_id.as_str()],
        }
    }
}
