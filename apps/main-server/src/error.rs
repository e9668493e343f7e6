//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rpc_protocol::{ApiError, ErrorResponse, error_codes};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Input failed validation (empty body, anonymous author).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found or not accessible.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Permission denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] task_store::TaskStoreError),
}

impl ServerError {
    /// Returns true if the error means the record is missing or hidden.
    pub fn is_not_found(&self) -> bool {
        match self {
            ServerError::NotFound(_) => true,
            ServerError::Database(e) => e.is_not_found(),
            _ => false,
        }
    }

    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            ServerError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMS),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_REQUEST),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND),
            ServerError::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, error_codes::AUTHENTICATION_REQUIRED)
            }
            ServerError::PermissionDenied(_) => (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED),
            ServerError::Database(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, error_codes::RESOURCE_NOT_FOUND)
            }
            ServerError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            ServerError::Validation(msg)
            | ServerError::InvalidRequest(msg)
            | ServerError::NotFound(msg)
            | ServerError::PermissionDenied(msg) => msg.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = ErrorResponse::from(ApiError::new(code, message));
        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
