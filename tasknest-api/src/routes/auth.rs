/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Register a new user
/// - `POST /login` - Login and get a bearer token
///
/// Registration hashes the password with Argon2id before anything touches
/// the store. Login failures are uniform: an unknown email and a wrong
/// password produce the same response.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "username": "jane",
///   "email": "jane@example.com",
///   "password": "hunter22"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    // The unique index on email turns a duplicate registration into a
    // conflict; no lookup-then-insert race.
    User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Login endpoint
///
/// Authenticates a user and returns a bearer token whose subject is the
/// user's email.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {
///   "email": "jane@example.com",
///   "password": "hunter22"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let claims = jwt::Claims::new(user.email, state.token_ttl());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = RegisterRequest {
            username: "jane".to_string(),
            email: "not-an-email".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            username: "".to_string(),
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let req = LoginRequest {
            email: "jane@example.com".to_string(),
            password: "anything".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = LoginRequest {
            email: "nope".to_string(),
            password: "anything".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
