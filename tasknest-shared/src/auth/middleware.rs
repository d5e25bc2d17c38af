/// Authentication middleware for Axum
///
/// The gateway in front of every task route: extracts the bearer
/// credential from the `Authorization` header, validates it, and attaches
/// the resolved identity to the request's extensions. Handlers downstream
/// learn "who is calling" only through [`AuthContext`].
///
/// Every credential failure (missing header, wrong scheme, bad signature,
/// expired token) is reported to the caller as a uniform 401. The precise
/// cause is logged but never exposed.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use tasknest_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn protected(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.subject)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .layer(middleware::from_fn(create_jwt_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, JwtError};

/// Authentication context added to request extensions
///
/// Present on a request if and only if its bearer token verified. Handlers
/// extract it with Axum's `Extension` extractor and resolve the subject to
/// a user record themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Verified token subject (the user's email address)
    pub subject: String,
}

impl AuthContext {
    /// Creates an auth context for a verified subject
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Error type for the authentication gateway
///
/// Variants are kept distinct for logging; the caller-facing response is
/// the same 401 for all of them.
#[derive(Debug)]
pub enum AuthError {
    /// Authorization header absent or not in `Bearer <token>` form
    MissingCredentials,

    /// Token failed validation
    InvalidToken(JwtError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingCredentials => {
                tracing::debug!("Rejected request with missing or malformed Authorization header");
            }
            AuthError::InvalidToken(e) => {
                tracing::debug!(cause = %e, "Rejected request with invalid bearer token");
            }
        }

        let body = Json(json!({
            "error": "unauthorized",
            "message": "Missing or invalid credentials",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extracts the bearer token from an Authorization header value
///
/// Returns None unless the header is exactly `Bearer <token>`.
fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

/// JWT authentication middleware
///
/// Short-circuits with 401 before any handler logic runs when the
/// credential is absent, malformed, expired, or forged. On success the
/// request gains an [`AuthContext`] extension carrying the token subject.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = bearer_token(auth_header).ok_or(AuthError::MissingCredentials)?;

    let claims = validate_token(token, &secret).map_err(AuthError::InvalidToken)?;

    req.extensions_mut().insert(AuthContext::new(claims.sub));

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Captures the JWT secret so the result can be handed to
/// `axum::middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
