//! In-memory document store.
//!
//! Documents are kept as raw JSON, the way the hosted store holds them, and
//! parsed on every read.

use std::collections::HashMap;

use async_trait::async_trait;
use entities::{Comment, Task};
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::{
    parse_comment, parse_task, ChangeFeed, CommentRecord, StoreChange, TaskFilter, TaskRecord,
    TaskStore, TaskStoreError, TaskStoreResult, COMMENTS_COLLECTION, TASKS_COLLECTION,
};

/// In-memory task store.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<String, Value>>,
    comments: RwLock<HashMap<String, Value>>,
    feed: ChangeFeed,
}

impl MemoryTaskStore {
    /// Creates a new in-memory task store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a raw document, bypassing the record schema.
    ///
    /// Stands in for writes made by other clients of the document store.
    pub async fn put_document(
        &self,
        collection: &'static str,
        id: impl Into<String>,
        document: Value,
    ) -> TaskStoreResult<()> {
        let id = id.into();
        let documents = match collection {
            TASKS_COLLECTION => &self.tasks,
            COMMENTS_COLLECTION => &self.comments,
            other => {
                return Err(TaskStoreError::Other(format!(
                    "unknown collection: {other}"
                )))
            }
        };
        documents.write().await.insert(id.clone(), document);
        self.feed
            .publish(StoreChange::DocumentWritten { collection, id });
        Ok(())
    }

    /// Returns the number of live change subscribers.
    pub fn change_subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }
}

/// Reads a string field from a raw document.
fn str_field<'a>(document: &'a Value, field: &str) -> Option<&'a str> {
    document.get(field).and_then(Value::as_str)
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    // =========================================================================
    // Task operations
    // =========================================================================

    async fn insert_task(&self, record: TaskRecord) -> TaskStoreResult<Task> {
        let id = Uuid::new_v4().to_string();
        let document = serde_json::to_value(&record)?;
        let task = record.into_task(id.clone())?;

        self.tasks.write().await.insert(id.clone(), document);
        self.feed.publish(StoreChange::TaskInserted {
            id,
            owner: task.owner.clone(),
        });
        Ok(task)
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        match tasks.get(id) {
            Some(document) => Ok(Some(parse_task(id, document)?)),
            None => Ok(None),
        }
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut result: Vec<Task> = tasks
            .iter()
            .filter(|(_, document)| {
                filter
                    .owner
                    .as_deref()
                    .is_none_or(|owner| str_field(document, "user") == Some(owner))
            })
            .filter_map(|(id, document)| match parse_task(id, document) {
                Ok(task) => Some(task),
                Err(e) => {
                    tracing::warn!(task_id = %id, error = %e, "Skipping malformed task document");
                    None
                }
            })
            .filter(|task| filter.matches(task))
            .collect();
        result.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(result)
    }

    async fn update_task_visibility(&self, id: &str, is_public: bool) -> TaskStoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        let document = tasks
            .get_mut(id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))?;

        let mut record = TaskRecord::from_document(id, document)?;
        record.public = is_public;
        *document = serde_json::to_value(&record)?;
        let task = record.into_task(id)?;

        self.feed.publish(StoreChange::TaskUpdated {
            id: id.to_string(),
            owner: task.owner.clone(),
        });
        Ok(task)
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        let mut tasks = self.tasks.write().await;
        let document = tasks
            .remove(id)
            .ok_or_else(|| TaskStoreError::not_found("Task", id))?;

        self.feed.publish(StoreChange::TaskDeleted {
            id: id.to_string(),
            owner: str_field(&document, "user").map(str::to_string),
        });
        Ok(())
    }

    async fn count_tasks(&self) -> TaskStoreResult<u64> {
        Ok(self.tasks.read().await.len() as u64)
    }

    // =========================================================================
    // Comment operations
    // =========================================================================

    async fn insert_comment(&self, record: CommentRecord) -> TaskStoreResult<Comment> {
        let id = Uuid::new_v4().to_string();
        let document = serde_json::to_value(&record)?;
        let comment = record.into_comment(id.clone())?;

        self.comments.write().await.insert(id.clone(), document);
        self.feed.publish(StoreChange::CommentInserted {
            id,
            task_id: comment.task_id.clone(),
        });
        Ok(comment)
    }

    async fn get_comment(&self, id: &str) -> TaskStoreResult<Option<Comment>> {
        let comments = self.comments.read().await;
        match comments.get(id) {
            Some(document) => Ok(Some(parse_comment(id, document)?)),
            None => Ok(None),
        }
    }

    async fn list_comments(&self, task_id: &str) -> TaskStoreResult<Vec<Comment>> {
        let comments = self.comments.read().await;
        let mut result: Vec<Comment> = comments
            .iter()
            .filter(|(_, document)| str_field(document, "taskId") == Some(task_id))
            .filter_map(|(id, document)| match parse_comment(id, document) {
                Ok(comment) => Some(comment),
                Err(e) => {
                    tracing::warn!(comment_id = %id, error = %e, "Skipping malformed comment document");
                    None
                }
            })
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn delete_comment(&self, id: &str) -> TaskStoreResult<()> {
        let mut comments = self.comments.write().await;
        let document = comments
            .remove(id)
            .ok_or_else(|| TaskStoreError::not_found("Comment", id))?;

        self.feed.publish(StoreChange::CommentDeleted {
            id: id.to_string(),
            task_id: str_field(&document, "taskId").map(str::to_string),
        });
        Ok(())
    }

    async fn count_comments(&self) -> TaskStoreResult<u64> {
        Ok(self.comments.read().await.len() as u64)
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.feed.subscribe()
    }
}
