//! Page data endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rpc_protocol::responses::{DashboardResponse, HomeResponse, TaskPageResponse};
use task_store::TaskStore;

use crate::error::ServerResult;
use crate::middleware::auth::MaybeUser;
use crate::state::AppState;
use crate::views::TaskPage;

/// Home page statistics.
pub async fn home<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<HomeResponse>> {
    let posts = state.tasks.count_tasks().await?;
    let comments = state.comments.count_comments().await?;

    Ok(Json(HomeResponse { posts, comments }))
}

/// Dashboard data of the caller. Anonymous visitors go back home.
pub async fn dashboard<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    MaybeUser(user): MaybeUser,
) -> ServerResult<Response> {
    let Some(user) = user else {
        return Ok(Redirect::temporary("/").into_response());
    };

    let tasks = state.tasks.list_tasks_for_owner(&user).await?;

    Ok(Json(DashboardResponse { user, tasks }).into_response())
}

/// Task page data. Missing and private tasks redirect home.
pub async fn task_page<S: TaskStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> ServerResult<Response> {
    let page = match TaskPage::open(&state.tasks, state.comments.clone(), &id).await {
        Ok(page) => page,
        Err(e) if e.is_not_found() => {
            tracing::debug!(task_id = %id, "Task page not available, redirecting home");
            return Ok(Redirect::temporary("/").into_response());
        }
        Err(e) => return Err(e),
    };

    let can_comment = TaskPage::<S>::can_comment(user.as_ref());
    let (task, comments) = page.into_parts();

    Ok(Json(TaskPageResponse {
        task,
        comments,
        can_comment,
    })
    .into_response())
}
