//! Task management API endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use rpc_protocol::{requests::*, responses::*};
use task_store::TaskStore;

use crate::error::ServerResult;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Creates a task owned by the caller.
pub async fn create_task<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> ServerResult<Json<CreateTaskResponse>> {
    let task = state
        .tasks
        .create_task(&user, &request.body, request.is_public)
        .await?;

    Ok(Json(CreateTaskResponse { task }))
}

/// Lists the caller's tasks, newest first.
pub async fn list_tasks<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(_request): Json<ListTasksRequest>,
) -> ServerResult<Json<ListTasksResponse>> {
    let tasks = state.tasks.list_tasks_for_owner(&user).await?;

    Ok(Json(ListTasksResponse { tasks }))
}

/// Deletes one of the caller's tasks.
pub async fn delete_task<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<DeleteTaskRequest>,
) -> ServerResult<Json<DeleteTaskResponse>> {
    state.tasks.delete_task(&user, &request.task_id).await?;

    Ok(Json(DeleteTaskResponse {}))
}

/// Marks one of the caller's tasks public or private.
pub async fn update_task_visibility<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateTaskVisibilityRequest>,
) -> ServerResult<Json<UpdateTaskVisibilityResponse>> {
    let task = state
        .tasks
        .set_task_visibility(&user, &request.task_id, request.is_public)
        .await?;

    Ok(Json(UpdateTaskVisibilityResponse { task }))
}

/// Returns the share link of one of the caller's public tasks.
pub async fn share_task<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ShareTaskRequest>,
) -> ServerResult<Json<ShareTaskResponse>> {
    let url = state
        .tasks
        .share_link(&user, &request.task_id, &state.config.public_url)
        .await?;

    Ok(Json(ShareTaskResponse { url }))
}
