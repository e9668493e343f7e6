//! Visibility and ownership checks shared by the adapters and the pages.

use entities::{Comment, Identity, Task};

use crate::error::{ServerError, ServerResult};

/// Returns true if `task` belongs in the personal list of `identity`.
///
/// The public flag plays no part here.
pub fn is_listed_for(task: &Task, identity: &Identity) -> bool {
    task.is_owned_by(&identity.email)
}

/// Returns true if `task` can be opened through its share link, whoever
/// asks.
pub fn is_shared(task: &Task) -> bool {
    task.is_shared()
}

/// Fails unless `identity` owns `task`.
pub fn ensure_task_owner(task: &Task, identity: &Identity) -> ServerResult<()> {
    if is_listed_for(task, identity) {
        Ok(())
    } else {
        Err(ServerError::PermissionDenied(format!(
            "Task {} belongs to another user",
            task.id
        )))
    }
}

/// Fails unless `identity` wrote `comment`.
pub fn ensure_comment_author(comment: &Comment, identity: &Identity) -> ServerResult<()> {
    if comment.is_authored_by(&identity.email) {
        Ok(())
    } else {
        Err(ServerError::PermissionDenied(format!(
            "Comment {} was written by another user",
            comment.id
        )))
    }
}

/// Fails with a validation error if `value` is empty or whitespace.
pub fn ensure_not_blank(field: &str, value: &str) -> ServerResult<()> {
    if value.trim().is_empty() {
        return Err(ServerError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
