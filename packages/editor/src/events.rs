//! Session change notifications
//!
//! Subscribers receive every event published after they subscribe. A
//! subscriber that falls behind by more than the channel capacity skips the
//! oldest events; the next `DocumentChanged` carries the complete document,
//! so nothing needs to be replayed.

use chrono::{DateTime, Utc};
use composer_model::Document;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

/// An element picked in the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSelection {
    pub block_id: String,
    pub element_id: String,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The working document changed; carries the new snapshot
    DocumentChanged {
        revision: u64,
        document: Arc<Document>,
    },

    DirtyChanged(bool),

    SelectionChanged(Option<ElementSelection>),

    /// The document at `revision` was committed
    Saved {
        revision: u64,
        saved_at: DateTime<Utc>,
    },

    SaveFailed {
        revision: u64,
        message: String,
        validation: bool,
    },
}

pub(crate) struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn stream(&self) -> impl Stream<Item = SessionEvent> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|event| match event {
            Ok(event) => Some(event),
            Err(lagged) => {
                tracing::warn!("[Events] Subscriber lagged: {}", lagged);
                None
            }
        })
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}
