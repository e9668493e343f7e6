//! API error types

use serde::{Deserialize, Serialize};

/// Error codes carried in the error envelope.
pub mod error_codes {
    /// The JSON sent is not a valid request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// Invalid parameter(s), such as an empty task body
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Authentication required
    pub const AUTHENTICATION_REQUIRED: i32 = -32001;
    /// User is authenticated but not allowed to perform this action
    pub const PERMISSION_DENIED: i32 = -32002;
    /// The requested resource was not found
    pub const RESOURCE_NOT_FOUND: i32 = -32003;
}

/// Error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl ApiError {
    /// Creates a new error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error envelope: `{ "error": { "code", "message" } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

impl From<ApiError> for ErrorResponse {
    fn from(error: ApiError) -> Self {
        Self { error }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
