/// Task endpoints
///
/// The task service: create, list (with filtering and sorting), fetch,
/// merge-patch update, and delete, all scoped to the authenticated owner.
///
/// Every handler first resolves the token subject to a user record; a
/// token that outlives its account yields 404. Task lookups are scoped to
/// the owner in the same query, so "someone else's task" and "no such
/// task" are indistinguishable to the caller.
///
/// # Endpoints
///
/// - `POST   /tasks` - Create a task
/// - `GET    /tasks` - List tasks (filters: due_before, due_after,
///   priority, status; sorting: sort_by, order)
/// - `GET    /tasks/:task_id` - Fetch one task
/// - `PUT    /tasks/:task_id` - Merge-patch update
/// - `DELETE /tasks/:task_id` - Delete

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tasknest_shared::{
    auth::middleware::AuthContext,
    models::{
        task::{CreateTask, Priority, Task, UpdateTask},
        user::User,
    },
    query::{sort_tasks, TaskQuery, TaskQueryParams},
};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (non-empty, at most 100 characters)
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Due date as `YYYY-MM-DD`
    pub due_date: String,

    /// Priority; only High, Medium, or Low deserialize
    pub priority: Priority,

    /// Completion status
    pub status: bool,
}

/// Merge-patch update request
///
/// Absent fields leave the stored values untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    /// Due date as `YYYY-MM-DD`
    pub due_date: Option<String>,

    pub priority: Option<Priority>,

    pub status: Option<bool>,
}

/// Resolves the authenticated subject to its user record
///
/// Tokens are not revoked when accounts disappear, so this can miss; the
/// request fails with 404 rather than anything fatal.
async fn resolve_owner(state: &AppState, auth: &AuthContext) -> Result<User, ApiError> {
    User::find_by_email(&state.db, &auth.subject)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

fn parse_due_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("due_date", "Invalid date format. Use YYYY-MM-DD."))
}

/// Create a new task owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Write report",
///   "description": "Q3 numbers",
///   "due_date": "2024-01-15",
///   "priority": "High",
///   "status": false
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: Token subject has no user record
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;
    let due_date = parse_due_date(&req.due_date)?;

    let user = resolve_owner(&state, &auth).await?;

    let task = Task::create(
        &state.db,
        user.id,
        CreateTask {
            title: req.title,
            description: req.description,
            due_date,
            priority: req.priority,
            status: req.status,
        },
    )
    .await?;

    tracing::debug!(task_id = task.id, owner_id = user.id, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the caller's tasks, filtered and sorted
///
/// # Endpoint
///
/// ```text
/// GET /tasks?due_before=2024-06-30&priority=High&status=false&sort_by=due_date&order=asc
/// Authorization: Bearer <token>
/// ```
///
/// Date filters are inclusive and strict; `status` must be "true" or
/// "false"; an unrecognized `priority` is ignored rather than rejected.
/// `sort_by` defaults to `due_date`, `order` to `asc`.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: Token subject has no user record
/// - `422 Unprocessable Entity`: Invalid filter or sort parameter
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<TaskQueryParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let user = resolve_owner(&state, &auth).await?;

    let query = TaskQuery::parse(&params)?;

    let mut tasks = Task::find_by_owner(&state.db, user.id, &query).await?;
    sort_tasks(&mut tasks, query.sort_by, query.order);

    Ok(Json(tasks))
}

/// Fetch a single task
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such task for this owner
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let user = resolve_owner(&state, &auth).await?;

    let task = Task::find_by_id_and_owner(&state.db, task_id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Merge-patch update of a task
///
/// Only fields present in the body change; validation happens before any
/// mutation, and the update is a single statement, so a failure never
/// leaves a partially-applied patch.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No such task for this owner
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let user = resolve_owner(&state, &auth).await?;

    // Ownership first: a bad patch against someone else's task must still
    // read as 404, not as a validation failure.
    Task::find_by_id_and_owner(&state.db, task_id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    req.validate()?;
    let due_date = req.due_date.as_deref().map(parse_due_date).transpose()?;

    let task = Task::update(
        &state.db,
        task_id,
        user.id,
        UpdateTask {
            title: req.title,
            description: req.description,
            due_date,
            priority: req.priority,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: Already absent or not owned by the caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let user = resolve_owner(&state, &auth).await?;

    let deleted = Task::delete(&state.db, task_id, user.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::debug!(task_id, owner_id = user.id, "Deleted task");

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_title_bounds() {
        let req = CreateTaskRequest {
            title: "Write report".to_string(),
            description: None,
            due_date: "2024-01-15".to_string(),
            priority: Priority::High,
            status: false,
        };
        assert!(req.validate().is_ok());

        let req = CreateTaskRequest {
            title: String::new(),
            description: None,
            due_date: "2024-01-15".to_string(),
            priority: Priority::High,
            status: false,
        };
        assert!(req.validate().is_err());

        let req = CreateTaskRequest {
            title: "x".repeat(101),
            description: None,
            due_date: "2024-01-15".to_string(),
            priority: Priority::High,
            status: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_skips_absent_fields() {
        let req = UpdateTaskRequest::default();
        assert!(req.validate().is_ok());

        let req = UpdateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(
            parse_due_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        assert!(parse_due_date("15-01-2024").is_err());
        assert!(parse_due_date("2024-1-5x").is_err());
        assert!(parse_due_date("someday").is_err());
    }

    #[test]
    fn test_create_request_rejects_unknown_priority() {
        let result: Result<CreateTaskRequest, _> = serde_json::from_str(
            r#"{
                "title": "t",
                "due_date": "2024-01-15",
                "priority": "Urgent",
                "status": false
            }"#,
        );
        assert!(result.is_err());
    }
}
