//! API endpoints.

pub mod auth;
pub mod comment;
pub mod events;
pub mod pages;
pub mod task;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use task_store::TaskStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: TaskStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Page endpoints
        .route("/", get(pages::home::<S>))
        .route("/dashboard", get(pages::dashboard::<S>))
        .route("/task/{id}", get(pages::task_page::<S>))
        // Task endpoints
        .route("/api/task/create", post(task::create_task::<S>))
        .route("/api/task/list", post(task::list_tasks::<S>))
        .route("/api/task/watch", get(events::watch_tasks::<S>))
        .route("/api/task/delete", post(task::delete_task::<S>))
        .route("/api/task/update-visibility", post(task::update_task_visibility::<S>))
        .route("/api/task/share", post(task::share_task::<S>))
        // Comment endpoints
        .route("/api/comment/create", post(comment::create_comment::<S>))
        .route("/api/comment/list", post(comment::list_comments::<S>))
        .route("/api/comment/delete", post(comment::delete_comment::<S>))
        // Auth endpoints
        .route("/api/auth/me", get(auth::get_current_user))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
