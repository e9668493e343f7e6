//! SQLite-backed task store.

use std::str::FromStr;

use async_trait::async_trait;
use entities::{Comment, Task};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row, Sqlite, SqlitePool,
};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    ChangeFeed, CommentRecord, StoreChange, TaskFilter, TaskRecord, TaskStore, TaskStoreError,
    TaskStoreResult, Timestamp,
};

/// Schema statements, applied on connect.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tarefas (
        id TEXT PRIMARY KEY NOT NULL,
        tarefa TEXT NOT NULL,
        created INTEGER NOT NULL,
        user TEXT NOT NULL,
        public INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_tarefas_user_created ON tarefas (user, created DESC)",
    "CREATE TABLE IF NOT EXISTS comments (
        id TEXT PRIMARY KEY NOT NULL,
        comment TEXT NOT NULL,
        created INTEGER NOT NULL,
        user TEXT NOT NULL,
        name TEXT NOT NULL,
        task_id TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_comments_task_created ON comments (task_id, created)",
];

const TASK_COLUMNS: &str = "SELECT id, tarefa, created, user, public FROM tarefas";
const COMMENT_COLUMNS: &str = "SELECT id, comment, created, user, name, task_id FROM comments";

/// Task store persisted in SQLite.
///
/// Timestamps are stored as unix milliseconds.
#[derive(Debug)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl SqliteTaskStore {
    /// Connects to `database_url` and creates the schema if needed.
    pub async fn connect(database_url: &str) -> TaskStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database opens a fresh database,
        // so keep exactly one alive.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;

        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub async fn in_memory() -> TaskStoreResult<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Wraps an existing pool. The schema is not created.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::new(),
        }
    }

    /// Creates tables and indexes.
    pub async fn migrate(&self) -> TaskStoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!("SQLite schema ready");
        Ok(())
    }
}

fn task_from_row(row: &SqliteRow) -> TaskStoreResult<Task> {
    let id: String = row.try_get("id")?;
    let record = TaskRecord {
        tarefa: row.try_get("tarefa")?,
        created: Timestamp::from_millis(row.try_get("created")?),
        user: row.try_get("user")?,
        public: row.try_get("public")?,
    };
    Ok(record.into_task(id)?)
}

fn comment_from_row(row: &SqliteRow) -> TaskStoreResult<Comment> {
    let id: String = row.try_get("id")?;
    let record = CommentRecord {
        comment: row.try_get("comment")?,
        created: Timestamp::from_millis(row.try_get("created")?),
        user: row.try_get("user")?,
        name: row.try_get("name")?,
        task_id: row.try_get("task_id")?,
    };
    Ok(record.into_comment(id)?)
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    // =========================================================================
    // Task operations
    // =========================================================================

    async fn insert_task(&self, record: TaskRecord) -> TaskStoreResult<Task> {
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO tarefas (id, tarefa, created, user, public) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&record.tarefa)
            .bind(record.created.as_millis())
            .bind(&record.user)
            .bind(record.public)
            .execute(&self.pool)
            .await?;

        // Millisecond precision is what a later read returns.
        let created = Timestamp::from_millis(record.created.as_millis());
        let task = record.with_created(created).into_task(id.clone())?;

        self.feed.publish(StoreChange::TaskInserted {
            id,
            owner: task.owner.clone(),
        });
        Ok(task)
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>> {
        let row = sqlx::query(&format!("{TASK_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(task_from_row).transpose()
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(TASK_COLUMNS);
        builder.push(" WHERE 1 = 1");
        if let Some(owner) = &filter.owner {
            builder.push(" AND user = ").push_bind(owner.clone());
        }
        if let Some(is_public) = filter.is_public {
            builder.push(" AND public = ").push_bind(is_public);
        }
        builder.push(" ORDER BY created DESC, id ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in &rows {
            match task_from_row(row) {
                Ok(task) => tasks.push(task),
                Err(TaskStoreError::Parse(e)) => {
                    tracing::warn!(error = %e, "Skipping malformed task row");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(tasks)
    }

    async fn update_task_visibility(&self, id: &str, is_public: bool) -> TaskStoreResult<Task> {
        let result = sqlx::query("UPDATE tarefas SET public = ? WHERE id = ?")
            .bind(is_public)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", id));
        }

        let task = self
            .get_task(id)
            .await?
            .ok_or_else(|| TaskStoreError::not_found("Task", id))?;

        self.feed.publish(StoreChange::TaskUpdated {
            id: id.to_string(),
            owner: task.owner.clone(),
        });
        Ok(task)
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        let owner: Option<String> = sqlx::query_scalar("DELETE FROM tarefas WHERE id = ? RETURNING user")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let owner = owner.ok_or_else(|| TaskStoreError::not_found("Task", id))?;

        self.feed.publish(StoreChange::TaskDeleted {
            id: id.to_string(),
            owner: Some(owner),
        });
        Ok(())
    }

    async fn count_tasks(&self) -> TaskStoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tarefas")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    // =========================================================================
    // Comment operations
    // =========================================================================

    async fn insert_comment(&self, record: CommentRecord) -> TaskStoreResult<Comment> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO comments (id, comment, created, user, name, task_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&record.comment)
        .bind(record.created.as_millis())
        .bind(&record.user)
        .bind(&record.name)
        .bind(&record.task_id)
        .execute(&self.pool)
        .await?;

        let created = Timestamp::from_millis(record.created.as_millis());
        let comment = record.with_created(created).into_comment(id.clone())?;

        self.feed.publish(StoreChange::CommentInserted {
            id,
            task_id: comment.task_id.clone(),
        });
        Ok(comment)
    }

    async fn get_comment(&self, id: &str) -> TaskStoreResult<Option<Comment>> {
        let row = sqlx::query(&format!("{COMMENT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(comment_from_row).transpose()
    }

    async fn list_comments(&self, task_id: &str) -> TaskStoreResult<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "{COMMENT_COLUMNS} WHERE task_id = ? ORDER BY created ASC, id ASC"
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in &rows {
            match comment_from_row(row) {
                Ok(comment) => comments.push(comment),
                Err(TaskStoreError::Parse(e)) => {
                    tracing::warn!(error = %e, "Skipping malformed comment row");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(comments)
    }

    async fn delete_comment(&self, id: &str) -> TaskStoreResult<()> {
        let task_id: Option<String> =
            sqlx::query_scalar("DELETE FROM comments WHERE id = ? RETURNING task_id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let task_id = task_id.ok_or_else(|| TaskStoreError::not_found("Comment", id))?;

        self.feed.publish(StoreChange::CommentDeleted {
            id: id.to_string(),
            task_id: Some(task_id),
        });
        Ok(())
    }

    async fn count_comments(&self) -> TaskStoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.feed.subscribe()
    }
}
