//! Task entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A personal task, optionally shared through its direct link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// Identity string (email) of the owner.
    pub owner: String,
    /// Task text.
    pub body: String,
    /// Whether the task is reachable through its share link.
    pub is_public: bool,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns true if `identity` owns this task.
    pub fn is_owned_by(&self, identity: &str) -> bool {
        self.owner == identity
    }

    /// Returns true if the task can be opened through its share link.
    pub fn is_shared(&self) -> bool {
        self.is_public
    }
}
