/// Bearer token issuance and validation
///
/// Tokens are HS256-signed JWTs carrying the user's identity, so guarded
/// handlers never need a store lookup to know who is calling.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Lifetime**: configurable, 7 days by default
/// - **Validation**: signature, expiry, not-before and issuer
/// - **Secret**: at least 32 bytes, enforced by the API config loader
///
/// # Example
///
/// ```
/// use hostkeep_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-that-is-at-least-32-bytes!!";
/// let claims = Claims::new(
///     Uuid::new_v4(),
///     "rlopes",
///     "Rita",
///     "Lopes",
///     "rita@example.com",
///     Duration::days(7),
/// )?;
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.username, "rlopes");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Issuer written into and required on every token
pub const ISSUER: &str = "hostkeep";

/// Default token lifetime in days
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims
///
/// Standard `sub`/`iss`/`iat`/`exp`/`nbf` plus the user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    pub username: String,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    pub iss: String,

    pub iat: i64,

    pub exp: i64,

    pub nbf: i64,
}

impl Claims {
    /// # Errors
    ///
    /// Returns `JwtError::CreateError` when `now + ttl` is out of range
    pub fn new(
        user_id: Uuid,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::CreateError(format!("Token lifetime out of range: {}", ttl)))?;

        Ok(Self {
            sub: user_id,
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            nbf: now.timestamp(),
        })
    }

    /// Claims for a stored user
    pub fn for_user(user: &User, ttl: Duration) -> Result<Self, JwtError> {
        Self::new(
            user.id,
            &user.username,
            &user.first_name,
            &user.last_name,
            &user.email,
            ttl,
        )
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token and returns its claims
///
/// # Errors
///
/// - `JwtError::Expired` past `exp`
/// - `JwtError::InvalidIssuer` when `iss` is not [`ISSUER`]
/// - `JwtError::ValidationError` for bad signatures or malformed tokens
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
