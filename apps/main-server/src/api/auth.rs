//! Session API endpoints.

use axum::Json;
use rpc_protocol::responses::CurrentUserResponse;

use crate::error::ServerResult;
use crate::middleware::auth::CurrentUser;

/// Gets the current authenticated user.
pub async fn get_current_user(
    CurrentUser(user): CurrentUser,
) -> ServerResult<Json<CurrentUserResponse>> {
    Ok(Json(CurrentUserResponse { user }))
}
