//! Server-Sent Events stream of the caller's live task list.
//!
//! Each event is named `tasks` and carries the whole list, newest first. The
//! first event is the list at subscription time. Dropping the connection
//! drops the subscription, which stops its worker.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use entities::Task;
use rpc_protocol::responses::TaskListEvent;
use task_store::TaskStore;

use crate::error::ServerResult;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// SSE endpoint for the caller's task list.
///
/// GET /api/task/watch
pub async fn watch_tasks<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
) -> ServerResult<Response> {
    let mut subscription = state.tasks.watch_tasks_for_owner(&user).await?;

    tracing::info!(owner = %user.email, "Task list stream connected");

    let stream = async_stream::stream! {
        if let Some(event) = tasks_event(subscription.current()) {
            yield Ok::<_, Infallible>(event);
        }

        while let Some(tasks) = subscription.changed().await {
            if let Some(event) = tasks_event(tasks) {
                yield Ok::<_, Infallible>(event);
            }
        }

        tracing::debug!(owner = %subscription.owner(), "Task list stream ended");
    };

    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response())
}

fn tasks_event(tasks: Vec<Task>) -> Option<Event> {
    match serde_json::to_string(&TaskListEvent { tasks }) {
        Ok(json) => Some(Event::default().event("tasks").data(json)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize task list event");
            None
        }
    }
}
