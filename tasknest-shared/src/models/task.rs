/// Task model and database operations
///
/// Tasks are the core entity of tasknest: per-user to-do items with a due
/// date, a priority, and a completion flag. Every task is owned by exactly
/// one user, and every operation here is scoped to that owner.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('High', 'Medium', 'Low');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(100) NOT NULL,
///     description TEXT,
///     due_date DATE NOT NULL,
///     priority task_priority NOT NULL,
///     status BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id BIGINT NOT NULL REFERENCES users(id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::task::{CreateTask, Priority, Task};
/// use chrono::NaiveDate;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, owner_id: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, owner_id, CreateTask {
///     title: "Write report".to_string(),
///     description: None,
///     due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
///     priority: Priority::High,
///     status: false,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::query::TaskQuery;

/// Task priority
///
/// A closed enumeration; no other value is accepted or stored. Ordering is
/// by [`Priority::rank`], never by the lexical string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Fixed sort rank: High=1, Medium=2, Low=3
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Gets priority as its canonical string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Parses the canonical string form, None for anything else
    ///
    /// Matching is exact (case-sensitive); filter callers treat None as
    /// "filter not applied".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Priority::High),
            "Medium" => Some(Priority::Medium),
            "Low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Task record
///
/// Field declaration order doubles as the serialized key order
/// (id, title, description, due_date, priority, status); the owner
/// reference is internal and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (store-assigned)
    pub id: i64,

    /// Title (non-empty, at most 100 characters)
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Calendar due date (no time component)
    pub due_date: NaiveDate,

    /// Priority
    pub priority: Priority,

    /// Completion status
    pub status: bool,

    /// Owning user; immutable after creation
    #[serde(skip_serializing)]
    pub user_id: i64,
}

/// Input for creating a new task
///
/// Fields are validated by the caller before they reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: bool,
}

/// Input for a merge-patch update
///
/// Only present fields change; absent fields keep their prior values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<bool>,
}

impl UpdateTask {
    /// True if the patch contains no fields
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

impl Task {
    /// Creates a new task owned by `owner_id`
    pub async fn create(
        pool: &PgPool,
        owner_id: i64,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, due_date, priority, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, due_date, priority, status, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.priority)
        .bind(data.status)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Returns None both when no such task exists and when it belongs to a
    /// different user; callers must not be able to tell the two apart.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_date, priority, status, user_id
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists an owner's tasks matching the validated query filters
    ///
    /// Rows come back in id order; the query engine applies the requested
    /// sort on top.
    pub async fn find_by_owner(
        pool: &PgPool,
        owner_id: i64,
        query: &TaskQuery,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut sql = String::from(
            "SELECT id, title, description, due_date, priority, status, user_id \
             FROM tasks WHERE user_id = $1",
        );
        let mut bind_count = 1;

        if query.due_before.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND due_date <= ${}", bind_count));
        }
        if query.due_after.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND due_date >= ${}", bind_count));
        }
        if query.priority.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND priority = ${}", bind_count));
        }
        if query.status.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND status = ${}", bind_count));
        }

        sql.push_str(" ORDER BY id");

        let mut q = sqlx::query_as::<_, Task>(&sql).bind(owner_id);

        if let Some(due_before) = query.due_before {
            q = q.bind(due_before);
        }
        if let Some(due_after) = query.due_after {
            q = q.bind(due_after);
        }
        if let Some(priority) = query.priority {
            q = q.bind(priority);
        }
        if let Some(status) = query.status {
            q = q.bind(status);
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Applies a merge-patch to a task, scoped to its owner
    ///
    /// Returns the fully updated record, or None if the task does not
    /// exist or is not owned by `owner_id`. An empty patch is a plain
    /// read.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id_and_owner(pool, id, owner_id).await;
        }

        let mut sets = Vec::new();
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            sets.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            sets.push(format!("due_date = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            sets.push(format!("priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            sets.push(format!("status = ${}", bind_count));
        }

        let sql = format!(
            "UPDATE tasks SET {} WHERE id = $1 AND user_id = $2 \
             RETURNING id, title, description, due_date, priority, status, user_id",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&sql).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, scoped to its owner
    ///
    /// Returns false when the task was already absent or not owned by
    /// `owner_id`; nothing cascades.
    pub async fn delete(pool: &PgPool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
