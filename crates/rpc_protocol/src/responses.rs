//! API response types.

use entities::{Comment, Identity, Task};
use serde::{Deserialize, Serialize};

// ============================================================================
// Task Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaskResponse {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskVisibilityResponse {
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareTaskResponse {
    pub url: String,
}

/// Payload of a `tasks` event on the live task list stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListEvent {
    pub tasks: Vec<Task>,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentResponse {}

// ============================================================================
// Session & Page Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: Identity,
}

/// Home page statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub posts: u64,
    pub comments: u64,
}

/// Dashboard page data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: Identity,
    pub tasks: Vec<Task>,
}

/// Task detail page data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPageResponse {
    pub task: Task,
    pub comments: Vec<Comment>,
    /// Whether the caller may post comments.
    pub can_comment: bool,
}
