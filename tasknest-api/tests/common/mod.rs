/// Common test utilities for integration tests
///
/// Shared infrastructure for the API integration suite:
/// - Test database setup and per-test user creation
/// - JWT token generation
/// - Request helpers driving the router directly (no network)
///
/// Tests using this module require a running PostgreSQL database reachable
/// via `DATABASE_URL`, plus a `JWT_SECRET` of at least 32 characters.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};
use tasknest_api::app::{build_router, AppState};
use tasknest_api::config::Config;
use tasknest_shared::auth::jwt::{create_token, Claims};
use tasknest_shared::auth::password::hash_password;
use tasknest_shared::db::migrations::run_migrations;
use tasknest_shared::models::user::{CreateUser, User};
use tower::ServiceExt;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        run_migrations(&db).await?;

        // Unique email per context so parallel tests don't collide
        let user = Self::create_user(&db, &format!("test-{}@example.com", unique_suffix())).await?;

        let claims = Claims::new(user.email.clone(), chrono::Duration::hours(1));
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Creates an additional user directly in the store
    pub async fn create_user(db: &PgPool, email: &str) -> anyhow::Result<User> {
        let user = User::create(
            db,
            CreateUser {
                username: "Test User".to_string(),
                email: email.to_string(),
                password_hash: hash_password("test-password")?,
            },
        )
        .await?;

        Ok(user)
    }

    /// Issues a token for an arbitrary subject
    pub fn token_for(&self, subject: &str) -> String {
        let claims = Claims::new(subject, chrono::Duration::hours(1));
        create_token(&claims, &self.config.jwt.secret).expect("Should create token")
    }

    /// Authorization header value for the context's user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Removes the rows this context created
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM tasks WHERE user_id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Sends a request through the router and parses the JSON response
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Creates a task via the API, returning its id
pub async fn create_test_task(
    ctx: &TestContext,
    title: &str,
    due_date: &str,
    priority: &str,
    status: bool,
) -> i64 {
    let (status_code, body) = send(
        &ctx.app,
        "POST",
        "/tasks",
        Some(&ctx.jwt_token),
        Some(serde_json::json!({
            "title": title,
            "due_date": due_date,
            "priority": priority,
            "status": status,
        })),
    )
    .await;

    assert_eq!(
        status_code,
        StatusCode::CREATED,
        "Task creation failed: {}",
        body
    );

    body["id"].as_i64().expect("Created task should have an id")
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}
