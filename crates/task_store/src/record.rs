//! Persisted record schema.
//!
//! Records mirror the documents written by the hosted store, field names
//! included. They are the only shape that crosses the storage boundary:
//! writes serialize a record, reads parse a record back into an entity and
//! reject anything that does not fit.

use chrono::{DateTime, Utc};
use entities::{Comment, Identity, Task};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ParseError;

/// Collection holding task documents.
pub const TASKS_COLLECTION: &str = "tarefas";

/// Collection holding comment documents.
pub const COMMENTS_COLLECTION: &str = "comments";

/// Document timestamp, stored as seconds plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl Timestamp {
    /// Returns the current time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Converts a UTC datetime.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self {
            seconds: datetime.timestamp(),
            nanoseconds: datetime.timestamp_subsec_nanos(),
        }
    }

    /// Builds a timestamp from unix milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1000),
            nanoseconds: (millis.rem_euclid(1000) * 1_000_000) as u32,
        }
    }

    /// Returns the timestamp as unix milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.seconds * 1000 + i64::from(self.nanoseconds / 1_000_000)
    }

    /// Converts to a UTC datetime.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, ParseError> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds).ok_or(
            ParseError::TimestampOutOfRange {
                seconds: self.seconds,
                nanoseconds: self.nanoseconds,
            },
        )
    }
}

/// A task document in the `tarefas` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task text.
    pub tarefa: String,
    /// Creation time.
    pub created: Timestamp,
    /// Owner identity string.
    pub user: String,
    /// Whether the task is shared.
    pub public: bool,
}

impl TaskRecord {
    /// Creates a record for a task created now.
    pub fn new(owner: impl Into<String>, body: impl Into<String>, is_public: bool) -> Self {
        Self {
            tarefa: body.into(),
            created: Timestamp::now(),
            user: owner.into(),
            public: is_public,
        }
    }

    /// Sets the creation time.
    pub fn with_created(mut self, created: Timestamp) -> Self {
        self.created = created;
        self
    }

    /// Decodes a raw document.
    pub fn from_document(id: &str, document: &Value) -> Result<Self, ParseError> {
        serde_json::from_value(document.clone()).map_err(|e| ParseError::Malformed {
            collection: TASKS_COLLECTION,
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Maps the record onto a task with the store-assigned `id`.
    pub fn into_task(self, id: impl Into<String>) -> Result<Task, ParseError> {
        let id = id.into();
        if self.user.is_empty() {
            return Err(ParseError::EmptyField {
                collection: TASKS_COLLECTION,
                id,
                field: "user",
            });
        }

        Ok(Task {
            created_at: self.created.to_datetime()?,
            id,
            owner: self.user,
            body: self.tarefa,
            is_public: self.public,
        })
    }
}

/// Parses a raw task document.
pub fn parse_task(id: &str, document: &Value) -> Result<Task, ParseError> {
    TaskRecord::from_document(id, document)?.into_task(id)
}

/// A comment document in the `comments` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Comment text.
    pub comment: String,
    /// Creation time.
    pub created: Timestamp,
    /// Author identity string.
    pub user: String,
    /// Author display name.
    pub name: String,
    /// Referenced task.
    #[serde(rename = "taskId")]
    pub task_id: String,
}

impl CommentRecord {
    /// Creates a record for a comment written now by `author`.
    pub fn new(task_id: impl Into<String>, author: &Identity, body: impl Into<String>) -> Self {
        Self {
            comment: body.into(),
            created: Timestamp::now(),
            user: author.email.clone(),
            name: author.display_name().to_string(),
            task_id: task_id.into(),
        }
    }

    /// Sets the creation time.
    pub fn with_created(mut self, created: Timestamp) -> Self {
        self.created = created;
        self
    }

    /// Decodes a raw document.
    pub fn from_document(id: &str, document: &Value) -> Result<Self, ParseError> {
        serde_json::from_value(document.clone()).map_err(|e| ParseError::Malformed {
            collection: COMMENTS_COLLECTION,
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Maps the record onto a comment with the store-assigned `id`.
    pub fn into_comment(self, id: impl Into<String>) -> Result<Comment, ParseError> {
        let id = id.into();
        for (field, value) in [("user", &self.user), ("taskId", &self.task_id)] {
            if value.is_empty() {
                return Err(ParseError::EmptyField {
                    collection: COMMENTS_COLLECTION,
                    id,
                    field,
                });
            }
        }

        Ok(Comment {
            created_at: self.created.to_datetime()?,
            id,
            task_id: self.task_id,
            author: self.user,
            author_display_name: self.name,
            body: self.comment,
        })
    }
}

/// Parses a raw comment document.
pub fn parse_comment(id: &str, document: &Value) -> Result<Comment, ParseError> {
    CommentRecord::from_document(id, document)?.into_comment(id)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_task_document_uses_store_field_names() {
        let record = TaskRecord::new("a@x.com", "Buy milk", true);
        let document = serde_json::to_value(&record).unwrap();

        assert_eq!(document["tarefa"], "Buy milk");
        assert_eq!(document["user"], "a@x.com");
        assert_eq!(document["public"], true);
        assert!(document["created"]["seconds"].is_i64());
    }

    #[test]
    fn test_parse_task() {
        let document = json!({
            "tarefa": "Buy milk",
            "created": { "seconds": 1_700_000_000, "nanoseconds": 0 },
            "user": "a@x.com",
            "public": false,
        });

        let task = parse_task("t1", &document).unwrap();
        assert_eq!(task.id, "t1");
        assert_eq!(task.owner, "a@x.com");
        assert_eq!(task.body, "Buy milk");
        assert!(!task.is_public);
        assert_eq!(task.created_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_task_missing_field() {
        let document = json!({
            "tarefa": "Buy milk",
            "created": { "seconds": 1_700_000_000, "nanoseconds": 0 },
            "user": "a@x.com",
        });

        let err = parse_task("t1", &document).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Malformed { collection: TASKS_COLLECTION, .. }
        ));
    }

    #[test]
    fn test_parse_task_wrong_type() {
        let document = json!({
            "tarefa": "Buy milk",
            "created": { "seconds": 1_700_000_000, "nanoseconds": 0 },
            "user": "a@x.com",
            "public": "yes",
        });

        assert!(parse_task("t1", &document).is_err());
    }

    #[test]
    fn test_parse_task_empty_owner() {
        let document = json!({
            "tarefa": "Buy milk",
            "created": { "seconds": 1_700_000_000, "nanoseconds": 0 },
            "user": "",
            "public": true,
        });

        let err = parse_task("t1", &document).unwrap_err();
        assert_eq!(
            err,
            ParseError::EmptyField {
                collection: TASKS_COLLECTION,
                id: "t1".to_string(),
                field: "user",
            }
        );
    }

    #[test]
    fn test_parse_comment() {
        let document = json!({
            "comment": "nice!",
            "created": { "seconds": 1_700_000_000, "nanoseconds": 500 },
            "user": "c@x.com",
            "name": "Carla",
            "taskId": "t1",
        });

        let comment = parse_comment("c1", &document).unwrap();
        assert_eq!(comment.task_id, "t1");
        assert_eq!(comment.author, "c@x.com");
        assert_eq!(comment.author_display_name, "Carla");
        assert_eq!(comment.body, "nice!");
    }

    #[test]
    fn test_parse_comment_without_task() {
        let document = json!({
            "comment": "nice!",
            "created": { "seconds": 1_700_000_000, "nanoseconds": 0 },
            "user": "c@x.com",
            "name": "Carla",
            "taskId": "",
        });

        assert!(matches!(
            parse_comment("c1", &document),
            Err(ParseError::EmptyField { field: "taskId", .. })
        ));
    }

    #[test]
    fn test_comment_record_uses_display_name() {
        let author = Identity::new("c@x.com");
        let record = CommentRecord::new("t1", &author, "nice!");
        assert_eq!(record.name, "c@x.com");

        let document = serde_json::to_value(&record).unwrap();
        assert_eq!(document["taskId"], "t1");
    }

    #[test]
    fn test_timestamp_millis() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanoseconds, 123_000_000);
        assert_eq!(ts.as_millis(), 1_700_000_000_123);

        let before_epoch = Timestamp::from_millis(-1);
        assert_eq!(before_epoch.seconds, -1);
        assert_eq!(before_epoch.nanoseconds, 999_000_000);
    }

    #[test]
    fn test_timestamp_out_of_range() {
        let ts = Timestamp {
            seconds: i64::MAX,
            nanoseconds: 0,
        };
        assert!(ts.to_datetime().is_err());
    }
}
