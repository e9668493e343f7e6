//! Comment API endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use rpc_protocol::{requests::*, responses::*};
use task_store::TaskStore;

use crate::error::ServerResult;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Comments on a public task as the caller.
pub async fn create_comment<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateCommentRequest>,
) -> ServerResult<Json<CreateCommentResponse>> {
    let task = state.tasks.get_public_task(&request.task_id).await?;
    let comment = state
        .comments
        .create_comment(Some(&user), &task.id, &request.body)
        .await?;

    Ok(Json(CreateCommentResponse { comment }))
}

/// Lists the comments of a public task, oldest first.
pub async fn list_comments<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<ListCommentsRequest>,
) -> ServerResult<Json<ListCommentsResponse>> {
    let task = state.tasks.get_public_task(&request.task_id).await?;
    let comments = state.comments.list_comments_for_task(&task.id).await?;

    Ok(Json(ListCommentsResponse { comments }))
}

/// Deletes one of the caller's comments.
pub async fn delete_comment<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<DeleteCommentRequest>,
) -> ServerResult<Json<DeleteCommentResponse>> {
    state
        .comments
        .delete_comment(&user, &request.comment_id)
        .await?;

    Ok(Json(DeleteCommentResponse {}))
}
