//! Personal task dashboard.

use entities::{Identity, Task};
use task_store::{TaskListSubscription, TaskStore};

use crate::error::ServerResult;
use crate::services::{TaskService, build_share_link, visibility};

/// The owner's dashboard: a task draft plus the live task list.
pub struct Dashboard<S: TaskStore + ?Sized> {
    owner: Identity,
    tasks: TaskService<S>,
    subscription: TaskListSubscription,
    input: String,
    public_task: bool,
}

impl<S: TaskStore + ?Sized + 'static> Dashboard<S> {
    /// Opens the dashboard of `owner` and subscribes to their task list.
    pub async fn open(tasks: TaskService<S>, owner: Identity) -> ServerResult<Self> {
        let subscription = tasks.watch_tasks_for_owner(&owner).await?;
        Ok(Self {
            owner,
            tasks,
            subscription,
            input: String::new(),
            public_task: false,
        })
    }

    /// Returns the dashboard owner.
    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    /// Returns the task draft.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the task draft.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Returns whether the draft will be created public.
    pub fn is_public_draft(&self) -> bool {
        self.public_task
    }

    /// Sets whether the draft will be created public.
    pub fn set_public(&mut self, public_task: bool) {
        self.public_task = public_task;
    }

    /// Returns the latest task list, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        self.subscription.current()
    }

    /// Waits until the store pushes a new task list.
    pub async fn refreshed(&mut self) -> Option<Vec<Task>> {
        self.subscription.changed().await
    }

    /// Creates a task from the draft.
    ///
    /// Returns true if a task was created; the draft is then cleared. An
    /// empty draft or a failed write leaves the draft untouched.
    pub async fn register_task(&mut self) -> bool {
        if self.input.is_empty() {
            return false;
        }

        match self
            .tasks
            .create_task(&self.owner, &self.input, self.public_task)
            .await
        {
            Ok(_) => {
                self.input.clear();
                self.public_task = false;
                true
            }
            Err(e) => {
                tracing::warn!(owner = %self.owner.email, error = %e, "Failed to register task");
                false
            }
        }
    }

    /// Deletes one of the owner's tasks. The list follows through the
    /// subscription.
    pub async fn delete_task(&mut self, task_id: &str) -> bool {
        match self.tasks.delete_task(&self.owner, task_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "Failed to delete task");
                false
            }
        }
    }

    /// Returns the share link of `task`, if it is public.
    pub fn share_link(&self, task: &Task, base_url: &str) -> Option<String> {
        visibility::is_shared(task).then(|| build_share_link(base_url, &task.id))
    }

    /// Closes the dashboard and cancels the live list.
    pub fn close(self) {
        self.subscription.unsubscribe();
    }
}
