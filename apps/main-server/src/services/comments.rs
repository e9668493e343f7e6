//! Comment adapter.

use std::sync::Arc;

use entities::{Comment, Identity};
use task_store::{CommentRecord, TaskStore};

use crate::error::{ServerError, ServerResult};
use crate::services::visibility;

/// Comment operations on behalf of an explicit caller identity.
pub struct CommentService<S: TaskStore + ?Sized> {
    store: Arc<S>,
}

impl<S: TaskStore + ?Sized> Clone for CommentService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TaskStore + ?Sized> CommentService<S> {
    /// Creates a new comment service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Attaches a comment by `author` to a task.
    ///
    /// The author must carry a display name. Whether the task accepts
    /// comments is decided by the caller.
    pub async fn create_comment(
        &self,
        author: Option<&Identity>,
        task_id: &str,
        body: &str,
    ) -> ServerResult<Comment> {
        let author = author
            .ok_or_else(|| ServerError::Validation("Sign in to comment".to_string()))?;
        if author.named().is_none() {
            return Err(ServerError::Validation(
                "A display name is required to comment".to_string(),
            ));
        }
        visibility::ensure_not_blank("Comment", body)?;

        let comment = self
            .store
            .insert_comment(CommentRecord::new(task_id, author, body))
            .await?;

        tracing::info!(comment_id = %comment.id, task_id = %task_id, author = %comment.author, "Comment created");
        Ok(comment)
    }

    /// Fetches the comments of a task once, oldest first.
    pub async fn list_comments_for_task(&self, task_id: &str) -> ServerResult<Vec<Comment>> {
        Ok(self.store.list_comments(task_id).await?)
    }

    /// Deletes a comment written by `caller`.
    pub async fn delete_comment(&self, caller: &Identity, id: &str) -> ServerResult<()> {
        let comment = self
            .store
            .get_comment(id)
            .await?
            .ok_or_else(|| ServerError::NotFound(format!("Comment {id} not found")))?;
        visibility::ensure_comment_author(&comment, caller)?;

        self.store.delete_comment(id).await?;

        tracing::info!(comment_id = %id, task_id = %comment.task_id, "Comment deleted");
        Ok(())
    }

    /// Counts all comments.
    pub async fn count_comments(&self) -> ServerResult<u64> {
        Ok(self.store.count_comments().await?)
    }
}
