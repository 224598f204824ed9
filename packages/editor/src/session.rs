//! # Edit Session
//!
//! One user's editing state for one document.
//!
//! A session owns the working document, the committed baseline, the element
//! selection, the undo history and the event channel. Every edit is a
//! [`Mutation`] applied synchronously through [`EditSession::apply`], so
//! history, dirty tracking and notifications stay in step.
//!
//! Saving is split in two so that edits can continue while a write is in
//! flight: [`EditSession::begin_save`] captures a snapshot,
//! [`EditSession::complete_save`] records the outcome. The baseline becomes
//! the captured snapshot, never edits made after it.

use composer_model::{
    factory::new_element, ids::is_reserved_id, Block, BlockCatalog, BlockKind, Content, Document,
    DragGesture, Element, ElementKind, IdGenerator, InvariantViolation, Props,
};
use composer_store::{DocumentStore, PersistenceGateway, SaveError, SaveReceipt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::Stream;

use crate::dirty::DirtyTracker;
use crate::events::{ElementSelection, EventBus, SessionEvent};
use crate::undo_stack::UndoStack;
use crate::{EditorError, Mutation};

/// Buffered events per subscriber
const EVENT_CAPACITY: usize = 64;

/// Attempts at drawing an unused id before giving up
const MAX_ID_ATTEMPTS: usize = 64;

/// Answer to "may the user navigate away?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveCheck {
    Proceed,
    /// Unsaved changes would be lost
    ConfirmDiscard,
}

/// A document snapshot on its way to storage
#[derive(Debug, Clone)]
pub struct SaveTicket {
    revision: u64,
    snapshot: Document,
}

impl SaveTicket {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn document(&self) -> &Document {
        &self.snapshot
    }
}

pub struct EditSession {
    key: String,
    catalog: Arc<BlockCatalog>,
    ids: Box<dyn IdGenerator>,
    working: Document,
    dirty: DirtyTracker,
    selection: Option<ElementSelection>,
    history: UndoStack,
    events: EventBus,
    revision: u64,
    /// Ids handed out by this session, including ones since removed
    issued: HashSet<String>,
}

impl EditSession {
    /// Start editing `document`, which is also taken as the committed baseline
    pub fn new(
        key: impl Into<String>,
        document: Document,
        catalog: Arc<BlockCatalog>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self {
            key: key.into(),
            catalog,
            ids,
            dirty: DirtyTracker::new(document.clone()),
            working: document,
            selection: None,
            history: UndoStack::new(),
            events: EventBus::new(EVENT_CAPACITY),
            revision: 0,
            issued: HashSet::new(),
        }
    }

    /// Load the committed document for `key` and start editing it
    pub async fn open<S: DocumentStore>(
        gateway: &PersistenceGateway<S>,
        key: impl Into<String>,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self, EditorError> {
        let key = key.into();
        let document = gateway.load(&key).await?;
        tracing::info!(
            "[Session] Opened {} ({} blocks)",
            key,
            document.blocks.len()
        );
        Ok(Self::new(key, document, gateway.shared_catalog(), ids))
    }

    /// Limit undo depth (0 = unlimited). Clears any history.
    pub fn with_history_levels(mut self, levels: usize) -> Self {
        self.history = UndoStack::with_max_levels(levels);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn document(&self) -> &Document {
        &self.working
    }

    /// Owned copy of the working document
    pub fn snapshot(&self) -> Document {
        self.working.clone()
    }

    /// Last committed document as known to this session
    pub fn baseline(&self) -> &Document {
        self.dirty.baseline()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Incremented on every change to the working document
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn event_stream(&self) -> impl Stream<Item = SessionEvent> {
        self.events.stream()
    }

    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    /// Create a block of `kind` and append it to the dynamic segment.
    ///
    /// Returns `None` when the block was not inserted, which only happens for
    /// a cta while one already exists.
    pub fn insert_dynamic(
        &mut self,
        kind: impl Into<BlockKind>,
    ) -> Result<Option<Block>, EditorError> {
        let kind = kind.into();
        let id = self.fresh_id()?;
        let block = self.catalog.materialize(&kind, id)?;

        let changed = self.apply(Mutation::InsertBlock {
            block: block.clone(),
        })?;
        Ok(changed.then_some(block))
    }

    pub fn remove_dynamic(&mut self, block_id: &str) -> Result<bool, EditorError> {
        self.apply(Mutation::RemoveBlock {
            block_id: block_id.to_string(),
        })
    }

    pub fn toggle_active(&mut self, block_id: &str, is_active: bool) -> Result<bool, EditorError> {
        self.apply(Mutation::SetBlockActive {
            block_id: block_id.to_string(),
            is_active,
        })
    }

    /// Ensure exactly one cta exists (`true`) or none does (`false`)
    pub fn set_cta_presence(&mut self, enabled: bool) -> Result<bool, EditorError> {
        let block = if enabled && self.working.blocks.cta().is_none() {
            let id = self.fresh_id()?;
            Some(self.catalog.materialize(&BlockKind::Cta, id)?)
        } else {
            None
        };

        if enabled && block.is_none() {
            tracing::debug!("[SetCtaPresence] Cta already present");
            return Ok(false);
        }
        self.apply(Mutation::SetCtaPresence { enabled, block })
    }

    pub fn reorder_dynamic(&mut self, source_id: &str, target_id: &str) -> Result<bool, EditorError> {
        self.apply(Mutation::ReorderBlocks {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        })
    }

    /// Complete a drag over the dynamic segment
    pub fn apply_drag(&mut self, gesture: &DragGesture) -> Result<bool, EditorError> {
        self.reorder_dynamic(&gesture.source, &gesture.target)
    }

    pub fn update_block_content(
        &mut self,
        block_id: &str,
        content: Content,
    ) -> Result<bool, EditorError> {
        self.apply(Mutation::UpdateBlockContent {
            block_id: block_id.to_string(),
            content,
        })
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    /// Create an element of `kind` and append it at the root of the block's tree.
    ///
    /// Returns `None` if the block has no element tree.
    pub fn add_element(
        &mut self,
        block_id: &str,
        kind: ElementKind,
    ) -> Result<Option<Element>, EditorError> {
        if self.working.element_tree(block_id).is_none() {
            tracing::debug!("[AddElement] Block {} has no element tree", block_id);
            return Ok(None);
        }

        let id = self.fresh_id()?;
        let element = new_element(kind, id);
        let changed = self.apply(Mutation::AddElement {
            block_id: block_id.to_string(),
            element: element.clone(),
        })?;
        Ok(changed.then_some(element))
    }

    /// Shallow-merge `props` into the element; `null` values remove keys
    pub fn update_element_props(
        &mut self,
        block_id: &str,
        element_id: &str,
        props: Props,
    ) -> Result<bool, EditorError> {
        self.apply(Mutation::UpdateElementProps {
            block_id: block_id.to_string(),
            element_id: element_id.to_string(),
            props,
        })
    }

    /// Remove the element and its descendants. A selection inside the removed
    /// subtree is cleared before this returns.
    pub fn delete_element(&mut self, block_id: &str, element_id: &str) -> Result<bool, EditorError> {
        self.apply(Mutation::DeleteElement {
            block_id: block_id.to_string(),
            element_id: element_id.to_string(),
        })
    }

    pub fn reorder_elements(
        &mut self,
        block_id: &str,
        source_id: &str,
        target_id: &str,
    ) -> Result<bool, EditorError> {
        self.apply(Mutation::ReorderElements {
            block_id: block_id.to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        })
    }

    /// Complete a drag among the siblings of one element tree
    pub fn apply_element_drag(
        &mut self,
        block_id: &str,
        gesture: &DragGesture,
    ) -> Result<bool, EditorError> {
        self.reorder_elements(block_id, &gesture.source, &gesture.target)
    }

    pub fn set_tree_metadata(
        &mut self,
        block_id: &str,
        name: &str,
        description: &str,
    ) -> Result<bool, EditorError> {
        self.apply(Mutation::SetTreeMetadata {
            block_id: block_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selection(&self) -> Option<&ElementSelection> {
        self.selection.as_ref()
    }

    /// Select an element. Ids that do not resolve are refused.
    pub fn select_element(&mut self, block_id: &str, element_id: &str) -> bool {
        if self.working.find_element(block_id, element_id).is_none() {
            tracing::debug!(
                "[Select] {} does not resolve in block {}",
                element_id,
                block_id
            );
            return false;
        }

        let selection = ElementSelection {
            block_id: block_id.to_string(),
            element_id: element_id.to_string(),
        };
        if self.selection.as_ref() != Some(&selection) {
            self.selection = Some(selection.clone());
            self.events
                .emit(SessionEvent::SelectionChanged(Some(selection)));
        }
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.events.emit(SessionEvent::SelectionChanged(None));
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Group the following edits into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.working = previous;
                self.publish_change();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(next) => {
                self.working = next;
                self.publish_change();
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Apply a mutation to the working document.
    ///
    /// Returns whether anything changed. Stale ids yield `Ok(false)`. On error
    /// the working document is left as it was.
    pub fn apply(&mut self, mutation: Mutation) -> Result<bool, EditorError> {
        let before = self.working.clone();

        match mutation.apply(&mut self.working) {
            Ok(outcome) if outcome.changed() => {}
            Ok(_) => return Ok(false),
            Err(e) => {
                self.working = before;
                tracing::error!("[{}] Rejected: {}", mutation.name(), e);
                return Err(e.into());
            }
        }

        tracing::debug!(
            "[{}] Applied to {} at revision {}",
            mutation.name(),
            self.key,
            self.revision + 1
        );
        self.history.record(mutation, before, self.working.clone());
        self.publish_change();
        Ok(true)
    }

    fn publish_change(&mut self) {
        self.revision += 1;
        self.events.emit(SessionEvent::DocumentChanged {
            revision: self.revision,
            document: Arc::new(self.working.clone()),
        });

        let stale = self.selection.as_ref().is_some_and(|selected| {
            self.working
                .find_element(&selected.block_id, &selected.element_id)
                .is_none()
        });
        if stale {
            self.clear_selection();
        }

        if let Some(dirty) = self.dirty.observe(&self.working) {
            self.events.emit(SessionEvent::DirtyChanged(dirty));
        }
    }

    /// Draw an id that no node carries in the working document or the
    /// baseline, and that this session has never handed out before
    fn fresh_id(&mut self) -> Result<String, EditorError> {
        let mut taken: HashSet<String> = self.working.all_ids().into_iter().collect();
        taken.extend(self.dirty.baseline().all_ids());

        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !id.is_empty()
                && !is_reserved_id(&id)
                && !taken.contains(&id)
                && !self.issued.contains(&id)
            {
                self.issued.insert(id.clone());
                return Ok(id);
            }
            tracing::debug!("[Session] Generated id {} is taken, drawing again", id);
            last = id;
        }

        if last.is_empty() {
            return Err(InvariantViolation::EmptyId.into());
        }
        Err(InvariantViolation::DuplicateId(last).into())
    }

    // ------------------------------------------------------------------
    // Leaving
    // ------------------------------------------------------------------

    pub fn leave_check(&self) -> LeaveCheck {
        if self.is_dirty() {
            LeaveCheck::ConfirmDiscard
        } else {
            LeaveCheck::Proceed
        }
    }

    /// Drop the session and its unsaved edits. Durable state is untouched.
    pub fn discard(self) {
        if self.is_dirty() {
            tracing::info!(
                "[Session] Discarded unsaved changes to {} at revision {}",
                self.key,
                self.revision
            );
        }
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Capture the working document for a save
    pub fn begin_save(&self) -> SaveTicket {
        SaveTicket {
            revision: self.revision,
            snapshot: self.working.clone(),
        }
    }

    /// Record the outcome of a save started with [`Self::begin_save`].
    ///
    /// On success the baseline becomes the ticket's snapshot. On failure the
    /// working document is kept for a retry.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<SaveReceipt, SaveError>,
    ) -> Result<SaveReceipt, EditorError> {
        match result {
            Ok(receipt) => {
                tracing::info!(
                    "[Session] Saved {} at revision {}",
                    self.key,
                    ticket.revision
                );
                let flipped = self.dirty.rebase(ticket.snapshot, &self.working);
                self.events.emit(SessionEvent::Saved {
                    revision: ticket.revision,
                    saved_at: receipt.saved_at,
                });
                if let Some(dirty) = flipped {
                    self.events.emit(SessionEvent::DirtyChanged(dirty));
                }
                Ok(receipt)
            }
            Err(e) => {
                self.report_save_failure(ticket.revision, &e);
                Err(e.into())
            }
        }
    }

    /// Validate and commit the working document
    pub async fn save<S: DocumentStore>(
        &mut self,
        gateway: &PersistenceGateway<S>,
    ) -> Result<SaveReceipt, EditorError> {
        let ticket = self.begin_save();
        let result = gateway.save(&self.key, ticket.document()).await;
        self.complete_save(ticket, result)
    }

    /// Commit one block's element tree with its metadata.
    ///
    /// A block that was never committed is saved with the whole working
    /// document instead.
    pub async fn save_block_tree<S: DocumentStore>(
        &mut self,
        gateway: &PersistenceGateway<S>,
        block_id: &str,
    ) -> Result<SaveReceipt, EditorError> {
        let revision = self.revision;
        let Some(tree) = self.working.element_tree(block_id).cloned() else {
            tracing::warn!("[Session] Block {} in {} has no element tree", block_id, self.key);
            return Err(EditorError::NoElementTree(block_id.to_string()));
        };

        match gateway.save_tree(&self.key, block_id, &tree).await {
            Ok(receipt) => {
                tracing::info!(
                    "[Session] Saved tree of {} in {} at revision {}",
                    block_id,
                    self.key,
                    revision
                );
                let flipped = self.dirty.rebase_tree(block_id, tree, &self.working);
                self.events.emit(SessionEvent::Saved {
                    revision,
                    saved_at: receipt.saved_at,
                });
                if let Some(dirty) = flipped {
                    self.events.emit(SessionEvent::DirtyChanged(dirty));
                }
                Ok(receipt)
            }
            Err(SaveError::BlockNotCommitted(_)) => {
                // A tree cannot be spliced into a document that lacks its block
                tracing::debug!(
                    "[Session] Block {} not committed yet, saving all of {}",
                    block_id,
                    self.key
                );
                self.save(gateway).await
            }
            Err(e) => {
                self.report_save_failure(revision, &e);
                Err(e.into())
            }
        }
    }

    /// Delete an element, then commit the block's tree.
    ///
    /// The removal is applied first and stays in the working document even
    /// when the save fails. Returns `Ok(false)` without saving if nothing was
    /// removed.
    pub async fn delete_element_and_save<S: DocumentStore>(
        &mut self,
        gateway: &PersistenceGateway<S>,
        block_id: &str,
        element_id: &str,
    ) -> Result<bool, EditorError> {
        if !self.delete_element(block_id, element_id)? {
            return Ok(false);
        }
        self.save_block_tree(gateway, block_id).await?;
        Ok(true)
    }

    fn report_save_failure(&self, revision: u64, e: &SaveError) {
        tracing::warn!(
            "[Session] Save of {} at revision {} failed: {}",
            self.key,
            revision,
            e
        );
        self.events.emit(SessionEvent::SaveFailed {
            revision,
            message: e.to_string(),
            validation: e.is_validation(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_model::{CatalogEntry, SequentialIds, HERO_BLOCK_ID, MENU_BLOCK_ID};
    use serde_json::json;

    fn catalog() -> Arc<BlockCatalog> {
        Arc::new(BlockCatalog::with_custom([CatalogEntry::new(
            BlockKind::from("landing"),
            "Landing",
            "Free-form section",
        )
        .with_elements()]))
    }

    fn session() -> EditSession {
        let catalog = catalog();
        let document = Document::empty(&catalog);
        EditSession::new("page", document, catalog, Box::new(SequentialIds::new("n")))
    }

    fn props(value: serde_json::Value) -> Props {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("props must be an object"),
        }
    }

    #[test]
    fn test_new_session_is_clean() {
        let session = session();
        assert!(!session.is_dirty());
        assert_eq!(session.revision(), 0);
        assert_eq!(session.leave_check(), LeaveCheck::Proceed);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_insert_and_remove_dynamic() {
        let mut session = session();

        let link = session.insert_dynamic(BlockKind::Link).unwrap().unwrap();
        assert_eq!(link.id, "n-1");
        assert!(session.is_dirty());
        assert_eq!(session.leave_check(), LeaveCheck::ConfirmDiscard);

        assert!(session.remove_dynamic(&link.id).unwrap());
        assert!(!session.is_dirty());
        assert!(!session.remove_dynamic(&link.id).unwrap());
    }

    #[test]
    fn test_anchor_kinds_are_refused() {
        let mut session = session();
        let err = session.insert_dynamic(BlockKind::Hero).unwrap_err();
        assert!(matches!(err, EditorError::Catalog(_)));
        assert!(!session.remove_dynamic(HERO_BLOCK_ID).unwrap());
        assert!(!session.remove_dynamic(MENU_BLOCK_ID).unwrap());
    }

    #[test]
    fn test_second_cta_insert_is_ignored() {
        let mut session = session();
        assert!(session.insert_dynamic(BlockKind::Cta).unwrap().is_some());
        assert!(session.insert_dynamic(BlockKind::Cta).unwrap().is_none());
        assert_eq!(session.document().blocks.dynamic().len(), 1);
    }

    #[test]
    fn test_cta_presence_is_idempotent() {
        let mut session = session();
        session.insert_dynamic(BlockKind::Link).unwrap();

        assert!(session.set_cta_presence(true).unwrap());
        assert!(!session.set_cta_presence(true).unwrap());
        let dynamic = session.document().blocks.dynamic();
        assert_eq!(dynamic.len(), 2);
        assert_eq!(dynamic[0].kind, BlockKind::Cta);

        assert!(session.set_cta_presence(false).unwrap());
        assert!(!session.set_cta_presence(false).unwrap());
        assert!(session.document().blocks.cta().is_none());
    }

    #[test]
    fn test_fresh_ids_skip_taken_ids() {
        let catalog = catalog();
        let mut document = Document::empty(&catalog);
        let existing = catalog
            .materialize(&BlockKind::Link, "n-1".to_string())
            .unwrap();
        document.blocks.insert_dynamic(existing).unwrap();

        // A restarted counter would collide with the committed block
        let mut session =
            EditSession::new("page", document, catalog, Box::new(SequentialIds::new("n")));
        let block = session.insert_dynamic(BlockKind::Website).unwrap().unwrap();
        assert_eq!(block.id, "n-2");
    }

    #[test]
    fn test_removed_committed_id_is_not_reissued() {
        let catalog = catalog();
        let mut document = Document::empty(&catalog);
        let committed = catalog
            .materialize(&BlockKind::Link, "n-1".to_string())
            .unwrap();
        document.blocks.insert_dynamic(committed).unwrap();

        let mut session =
            EditSession::new("page", document, catalog, Box::new(SequentialIds::new("n")));
        assert!(session.remove_dynamic("n-1").unwrap());

        let qr = session.insert_dynamic(BlockKind::Qr).unwrap().unwrap();
        assert_ne!(qr.id, "n-1");
        assert!(session.baseline().block("n-1").is_some());
    }

    #[test]
    fn test_undone_ids_are_not_reissued() {
        struct Scripted(Vec<&'static str>);
        impl IdGenerator for Scripted {
            fn next_id(&mut self) -> String {
                self.0.remove(0).to_string()
            }
        }

        let catalog = catalog();
        let document = Document::empty(&catalog);
        let mut session = EditSession::new(
            "page",
            document,
            catalog,
            Box::new(Scripted(vec!["x", "x", "y"])),
        );

        let first = session.insert_dynamic(BlockKind::Link).unwrap().unwrap();
        assert!(session.undo());
        let second = session.insert_dynamic(BlockKind::Website).unwrap().unwrap();
        assert_eq!(first.id, "x");
        assert_eq!(second.id, "y");
    }

    #[test]
    fn test_exhausted_id_generator_is_a_programming_error() {
        struct Stuck;
        impl IdGenerator for Stuck {
            fn next_id(&mut self) -> String {
                "hero".to_string()
            }
        }

        let catalog = catalog();
        let document = Document::empty(&catalog);
        let mut session = EditSession::new("page", document, catalog, Box::new(Stuck));
        let err = session.insert_dynamic(BlockKind::Link).unwrap_err();
        assert!(err.is_programming_error());
        assert_eq!(session.revision(), 0);
    }

    #[test]
    fn test_add_element_needs_a_tree() {
        let mut session = session();
        let link = session.insert_dynamic(BlockKind::Link).unwrap().unwrap();
        assert!(session
            .add_element(&link.id, ElementKind::Heading)
            .unwrap()
            .is_none());

        let landing = session.insert_dynamic("landing").unwrap().unwrap();
        let heading = session
            .add_element(&landing.id, ElementKind::Heading)
            .unwrap()
            .unwrap();
        assert_eq!(
            session.document().find_element(&landing.id, &heading.id),
            Some(&heading)
        );
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut session = session();
        let landing = session.insert_dynamic("landing").unwrap().unwrap();
        let heading = session
            .add_element(&landing.id, ElementKind::Heading)
            .unwrap()
            .unwrap();
        let divider = session
            .add_element(&landing.id, ElementKind::Divider)
            .unwrap()
            .unwrap();

        assert!(session.select_element(&landing.id, &heading.id));
        session.delete_element(&landing.id, &divider.id).unwrap();
        assert!(session.selection().is_some());

        session.delete_element(&landing.id, &heading.id).unwrap();
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_select_refuses_unknown_ids() {
        let mut session = session();
        let landing = session.insert_dynamic("landing").unwrap().unwrap();
        assert!(!session.select_element(&landing.id, "ghost"));
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_update_props_merges() {
        let mut session = session();
        let landing = session.insert_dynamic("landing").unwrap().unwrap();
        let heading = session
            .add_element(&landing.id, ElementKind::Heading)
            .unwrap()
            .unwrap();

        let changed = session
            .update_element_props(
                &landing.id,
                &heading.id,
                props(json!({ "text": "Welcome", "color": null })),
            )
            .unwrap();
        assert!(changed);

        let element = session
            .document()
            .find_element(&landing.id, &heading.id)
            .unwrap();
        assert_eq!(element.props["text"], "Welcome");
        assert!(!element.props.contains_key("color"));
        assert!(element.props.contains_key("level"));
    }

    #[test]
    fn test_undo_redo_restores_snapshots() {
        let mut session = session();
        let link = session.insert_dynamic(BlockKind::Link).unwrap().unwrap();
        session.toggle_active(&link.id, false).unwrap();

        assert!(session.undo());
        assert!(session.document().block(&link.id).unwrap().is_active);

        assert!(session.undo());
        assert!(session.document().block(&link.id).is_none());
        assert!(!session.is_dirty());

        assert!(session.redo());
        assert!(session.document().block(&link.id).is_some());
        assert!(session.is_dirty());
    }

    #[test]
    fn test_batch_undoes_as_one_step() {
        let mut session = session();
        session.begin_batch("Add two links");
        session.insert_dynamic(BlockKind::Link).unwrap();
        session.insert_dynamic(BlockKind::Link).unwrap();
        session.end_batch();

        assert!(session.undo());
        assert!(session.document().blocks.dynamic().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_unchanged_mutations_do_not_bump_revision() {
        let mut session = session();
        assert!(!session.toggle_active("ghost", false).unwrap());
        assert!(!session.reorder_dynamic("a", "b").unwrap());
        assert_eq!(session.revision(), 0);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_save_ticket_captures_revision() {
        let mut session = session();
        session.insert_dynamic(BlockKind::Link).unwrap();

        let ticket = session.begin_save();
        assert_eq!(ticket.revision(), 1);
        assert_eq!(ticket.document(), session.document());
    }

    #[test]
    fn test_complete_save_rebases_on_snapshot() {
        let mut session = session();
        session.insert_dynamic(BlockKind::Link).unwrap();
        let ticket = session.begin_save();
        let saved = ticket.document().clone();

        // Edited while the write was in flight
        session.insert_dynamic(BlockKind::Website).unwrap();

        let receipt = SaveReceipt {
            key: "page".to_string(),
            saved_at: chrono::Utc::now(),
        };
        session.complete_save(ticket, Ok(receipt)).unwrap();

        assert_eq!(session.baseline(), &saved);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_events_follow_edits() {
        let mut session = session();
        let mut rx = session.subscribe();

        session.insert_dynamic(BlockKind::Link).unwrap();

        match rx.try_recv().unwrap() {
            SessionEvent::DocumentChanged { revision, document } => {
                assert_eq!(revision, 1);
                assert_eq!(document.blocks.dynamic().len(), 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(matches!(
            rx.try_recv().unwrap(),
            SessionEvent::DirtyChanged(true)
        ));
        assert!(rx.try_recv().is_err());
    }
}
