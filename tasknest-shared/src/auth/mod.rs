/// Authentication utilities
///
/// This module provides the identity layer for tasknest:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation (HS256)
/// - [`middleware`]: Axum middleware that turns a bearer token into an
///   [`middleware::AuthContext`] on the request
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::auth::jwt::{create_token, validate_token, Claims};
/// use tasknest_shared::auth::password::{hash_password, verify_password};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Token issuance
/// let claims = Claims::new("user@example.com", Duration::hours(24));
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
