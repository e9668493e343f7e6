//! Live task lists.
//!
//! A subscription keeps an owner's task list in sync with the store: every
//! change that concerns the owner triggers a fresh query whose result is
//! published to the subscriber. The background worker lives exactly as long
//! as the [`TaskListSubscription`] handle.

use std::sync::Arc;

use entities::Task;
use tokio::{
    sync::{broadcast::error::RecvError, watch},
    task::JoinHandle,
};

use crate::{TaskFilter, TaskStore, TaskStoreResult};

/// Handle to a live, newest-first task list of one owner.
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
pub struct TaskListSubscription {
    owner: String,
    receiver: watch::Receiver<Vec<Task>>,
    worker: JoinHandle<()>,
}

impl TaskListSubscription {
    /// Returns the owner this list is scoped to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the latest snapshot.
    pub fn current(&self) -> Vec<Task> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the store stops publishing changes.
    pub async fn changed(&mut self) -> Option<Vec<Task>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Cancels the subscription.
    pub fn unsubscribe(self) {
        tracing::debug!(owner = %self.owner, "Task list unsubscribed");
        // Drop aborts the worker.
    }
}

impl Drop for TaskListSubscription {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

/// Subscribes to the task list of `owner`.
///
/// The returned handle already holds the initial snapshot.
pub async fn watch_tasks_for_owner<S>(
    store: Arc<S>,
    owner: impl Into<String>,
) -> TaskStoreResult<TaskListSubscription>
where
    S: TaskStore + ?Sized + 'static,
{
    let owner = owner.into();
    let filter = TaskFilter::new().with_owner(owner.clone());

    // Subscribe before the first query so no change falls in between.
    let mut changes = store.subscribe_changes();
    let initial = store.list_tasks(&filter).await?;
    let (sender, receiver) = watch::channel(initial);

    let worker_owner = owner.clone();
    let worker = tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) if !change.concerns_owner(&worker_owner) => continue,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(owner = %worker_owner, skipped, "Task list lagged, refreshing");
                }
                Err(RecvError::Closed) => break,
            }

            match store.list_tasks(&filter).await {
                Ok(tasks) => {
                    if sender.send(tasks).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(owner = %worker_owner, error = %e, "Failed to refresh task list");
                }
            }
        }
    });

    tracing::debug!(owner = %owner, "Task list subscribed");

    Ok(TaskListSubscription {
        owner,
        receiver,
        worker,
    })
}
