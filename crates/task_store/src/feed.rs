//! Change feed for store writes.

use tokio::sync::broadcast;

/// Capacity for the change broadcast channel.
const CHANNEL_CAPACITY: usize = 256;

/// A write applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// A task was inserted.
    TaskInserted { id: String, owner: String },
    /// A task was updated in place.
    TaskUpdated { id: String, owner: String },
    /// A task was deleted. The owner is unknown if the record was malformed.
    TaskDeleted { id: String, owner: Option<String> },
    /// A comment was inserted.
    CommentInserted { id: String, task_id: String },
    /// A comment was deleted.
    CommentDeleted { id: String, task_id: Option<String> },
    /// A raw document was written without going through a record.
    DocumentWritten {
        collection: &'static str,
        id: String,
    },
}

impl StoreChange {
    /// Returns true if the change may affect the task list of `owner`.
    pub fn concerns_owner(&self, owner: &str) -> bool {
        match self {
            Self::TaskInserted { owner: o, .. } | Self::TaskUpdated { owner: o, .. } => o == owner,
            Self::TaskDeleted { owner: Some(o), .. } => o == owner,
            Self::TaskDeleted { owner: None, .. } => true,
            Self::DocumentWritten { collection, .. } => *collection == crate::TASKS_COLLECTION,
            Self::CommentInserted { .. } | Self::CommentDeleted { .. } => false,
        }
    }
}

/// Broadcaster for store changes.
#[derive(Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<StoreChange>,
}

impl ChangeFeed {
    /// Creates a new change feed.
    pub fn new() -> Self {
        Self {
            sender: broadcast::channel(CHANNEL_CAPACITY).0,
        }
    }

    /// Subscribes to all future changes.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }

    /// Publishes a change to current subscribers.
    pub fn publish(&self, change: StoreChange) {
        tracing::trace!(?change, "Publishing store change");

        // Ignore send errors (no subscribers)
        let _ = self.sender.send(change);
    }

    /// Returns the number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
