//! Comment entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment attached to a public task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// ID of the task this comment belongs to.
    pub task_id: String,
    /// Identity string (email) of the author.
    pub author: String,
    /// Name shown next to the comment.
    pub author_display_name: String,
    /// Comment text.
    pub body: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Returns true if `identity` wrote this comment.
    pub fn is_authored_by(&self, identity: &str) -> bool {
        self.author == identity
    }
}
