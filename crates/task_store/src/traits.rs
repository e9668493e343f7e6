//! Task store trait definitions.

use async_trait::async_trait;
use entities::{Comment, Task};
use tokio::sync::broadcast;

use crate::{CommentRecord, StoreChange, TaskRecord, TaskStoreResult};

/// Filter options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Filter by owner identity.
    pub owner: Option<String>,
    /// Filter by public flag.
    pub is_public: Option<bool>,
}

impl TaskFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to tasks owned by `owner`.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Restricts the listing by public flag.
    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    /// Returns true if `task` passes the filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.owner.as_deref().is_none_or(|owner| task.owner == owner)
            && self.is_public.is_none_or(|p| task.is_public == p)
    }
}

/// Trait for task and comment storage operations.
///
/// Store operations carry no authorization: ownership checks belong to the
/// callers.
#[async_trait]
pub trait TaskStore: Send + Sync {
    // =========================================================================
    // Task operations
    // =========================================================================

    /// Inserts a task record and returns the task with its assigned ID.
    async fn insert_task(&self, record: TaskRecord) -> TaskStoreResult<Task>;

    /// Gets a task by ID.
    async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>>;

    /// Lists tasks matching the filter, newest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>>;

    /// Updates a task's public flag.
    async fn update_task_visibility(&self, id: &str, is_public: bool) -> TaskStoreResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: &str) -> TaskStoreResult<()>;

    /// Counts all tasks.
    async fn count_tasks(&self) -> TaskStoreResult<u64>;

    // =========================================================================
    // Comment operations
    // =========================================================================

    /// Inserts a comment record and returns the comment with its assigned ID.
    async fn insert_comment(&self, record: CommentRecord) -> TaskStoreResult<Comment>;

    /// Gets a comment by ID.
    async fn get_comment(&self, id: &str) -> TaskStoreResult<Option<Comment>>;

    /// Lists the comments of a task, oldest first.
    async fn list_comments(&self, task_id: &str) -> TaskStoreResult<Vec<Comment>>;

    /// Deletes a comment.
    async fn delete_comment(&self, id: &str) -> TaskStoreResult<()>;

    /// Counts all comments.
    async fn count_comments(&self) -> TaskStoreResult<u64>;

    // =========================================================================
    // Change feed
    // =========================================================================

    /// Subscribes to changes applied after this call.
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange>;
}
