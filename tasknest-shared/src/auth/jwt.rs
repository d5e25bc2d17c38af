/// JWT token generation and validation module
///
/// This module provides the bearer-token identity layer for tasknest.
/// Tokens are signed with HS256 (HMAC-SHA256) and carry the owning user's
/// email as the subject claim.
///
/// # Claims
///
/// - `sub`: Subject (the user's email address)
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration time (Unix timestamp)
///
/// Tokens are self-contained and never stored server-side; expiry is the
/// only invalidation mechanism.
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("user@example.com", Duration::hours(24));
/// let token = create_token(&claims, "test-secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_token(&token, "test-secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is malformed, has a bad signature, or is missing claims
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims structure
///
/// Exactly the three claims the service relies on. The subject is the
/// user's email address, which downstream handlers resolve back to a user
/// record per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user email
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims expiring `ttl` from now
    ///
    /// # Example
    ///
    /// ```
    /// use tasknest_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::new("user@example.com", Duration::hours(24));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Checks if the token has expired
    ///
    /// Expiry is inclusive: a token whose `exp` equals the current second
    /// is already expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration, None if already expired
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a signed JWT from claims
///
/// Signs with HS256 using the server-held secret. The output is a single
/// ASCII string safe for header transport.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
///
/// # Security
///
/// The secret should be at least 32 bytes, randomly generated, and loaded
/// from configuration at startup. Its compromise invalidates every token.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies the signature and that `exp` is in the future. Verification is
/// a pure function of the token, the secret, and the clock; no server-side
/// state is consulted.
///
/// # Errors
///
/// - `JwtError::Expired` if the current time is at or past `exp`
/// - `JwtError::Invalid` if the signature does not verify, the structure
///   is malformed, or required claims are absent
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // Expiry is exact: no clock-skew leeway.
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("user@example.com", Duration::hours(24));

        assert_eq!(claims.sub, "user@example.com");
        assert!(!claims.is_expired());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_claims_time_until_expiration() {
        let claims = Claims::new("user@example.com", Duration::hours(1));

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500);
        assert!(time_left.num_seconds() <= 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new("user@example.com", Duration::hours(24));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, "user@example.com");
        assert_eq!(validated.iat, claims.iat);
        assert_eq!(validated.exp, claims.exp);
    }

    #[test]
    fn test_token_is_header_safe_ascii() {
        let claims = Claims::new("user@example.com", Duration::hours(1));
        let token = create_token(&claims, SECRET).unwrap();

        assert!(token.is_ascii());
        assert!(!token.contains(char::is_whitespace));
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new("user@example.com", Duration::hours(1));
        let token = create_token(&claims, "secret1-secret1-secret1-secret1!").unwrap();

        let result = validate_token(&token, "wrong-secret-wrong-secret-wrong!");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        // Expired an hour ago
        let claims = Claims::new("user@example.com", Duration::seconds(-3600));

        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_malformed_token() {
        let result = validate_token("not-a-jwt", SECRET);
        assert!(matches!(result, Err(JwtError::Invalid(_))));

        let result = validate_token("a.b.c", SECRET);
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_token_missing_claims() {
        // A token signed with the right secret but without sub/exp claims
        // must be rejected rather than defaulted.
        #[derive(Serialize)]
        struct Bare {
            foo: String,
        }

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let token = encode(
            &header,
            &Bare {
                foo: "bar".to_string(),
            },
            &key,
        )
        .unwrap();

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }
}
