//! Task store error types.

use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted record does not match its schema.
    #[error("Invalid record: {0}")]
    Parse(#[from] ParseError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl TaskStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised while mapping a persisted record onto an entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The document could not be decoded with the collection schema.
    #[error("malformed {collection} document {id}: {reason}")]
    Malformed {
        collection: &'static str,
        id: String,
        reason: String,
    },

    /// A required text field is empty.
    #[error("{collection} document {id} has an empty `{field}` field")]
    EmptyField {
        collection: &'static str,
        id: String,
        field: &'static str,
    },

    /// The timestamp cannot be represented.
    #[error("timestamp out of range: {seconds}s {nanoseconds}ns")]
    TimestampOutOfRange { seconds: i64, nanoseconds: u32 },
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;
