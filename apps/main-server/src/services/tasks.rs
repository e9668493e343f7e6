//! Task adapter.

use std::sync::Arc;

use entities::{Identity, Task};
use task_store::{TaskFilter, TaskListSubscription, TaskRecord, TaskStore, watch_tasks_for_owner};

use crate::error::{ServerError, ServerResult};
use crate::services::{build_share_link, visibility};

/// Task operations on behalf of an explicit caller identity.
pub struct TaskService<S: TaskStore + ?Sized> {
    store: Arc<S>,
}

impl<S: TaskStore + ?Sized> Clone for TaskService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TaskStore + ?Sized + 'static> TaskService<S> {
    /// Creates a new task service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a task owned by `owner`.
    pub async fn create_task(
        &self,
        owner: &Identity,
        body: &str,
        is_public: bool,
    ) -> ServerResult<Task> {
        visibility::ensure_not_blank("Task body", body)?;

        let task = self
            .store
            .insert_task(TaskRecord::new(owner.email.as_str(), body, is_public))
            .await?;

        tracing::info!(task_id = %task.id, owner = %task.owner, is_public, "Task created");
        Ok(task)
    }

    /// Returns the current task list of `owner`, newest first.
    pub async fn list_tasks_for_owner(&self, owner: &Identity) -> ServerResult<Vec<Task>> {
        let filter = TaskFilter::new().with_owner(owner.email.as_str());
        Ok(self.store.list_tasks(&filter).await?)
    }

    /// Subscribes to the live task list of `owner`.
    pub async fn watch_tasks_for_owner(
        &self,
        owner: &Identity,
    ) -> ServerResult<TaskListSubscription> {
        Ok(watch_tasks_for_owner(Arc::clone(&self.store), owner.email.as_str()).await?)
    }

    /// Returns a task owned by `caller`.
    pub async fn get_owned_task(&self, caller: &Identity, id: &str) -> ServerResult<Task> {
        let task = self
            .store
            .get_task(id)
            .await?
            .ok_or_else(|| ServerError::NotFound(format!("Task {id} not found")))?;
        visibility::ensure_task_owner(&task, caller)?;
        Ok(task)
    }

    /// Returns a task for display through its share link.
    ///
    /// Missing and private tasks are both reported as not found.
    pub async fn get_public_task(&self, id: &str) -> ServerResult<Task> {
        match self.store.get_task(id).await? {
            Some(task) if visibility::is_shared(&task) => Ok(task),
            _ => Err(ServerError::NotFound(format!("Task {id} not found"))),
        }
    }

    /// Deletes a task owned by `caller`.
    pub async fn delete_task(&self, caller: &Identity, id: &str) -> ServerResult<()> {
        self.get_owned_task(caller, id).await?;
        self.store.delete_task(id).await?;

        tracing::info!(task_id = %id, owner = %caller.email, "Task deleted");
        Ok(())
    }

    /// Marks a task owned by `caller` public or private.
    pub async fn set_task_visibility(
        &self,
        caller: &Identity,
        id: &str,
        is_public: bool,
    ) -> ServerResult<Task> {
        self.get_owned_task(caller, id).await?;
        let task = self.store.update_task_visibility(id, is_public).await?;

        tracing::info!(task_id = %id, is_public, "Task visibility updated");
        Ok(task)
    }

    /// Returns the share link of a public task owned by `caller`.
    pub async fn share_link(
        &self,
        caller: &Identity,
        id: &str,
        base_url: &str,
    ) -> ServerResult<String> {
        let task = self.get_owned_task(caller, id).await?;
        if !visibility::is_shared(&task) {
            return Err(ServerError::InvalidRequest(format!(
                "Task {id} is private and cannot be shared"
            )));
        }
        Ok(build_share_link(base_url, &task.id))
    }

    /// Counts all tasks.
    pub async fn count_tasks(&self) -> ServerResult<u64> {
        Ok(self.store.count_tasks().await?)
    }
}
