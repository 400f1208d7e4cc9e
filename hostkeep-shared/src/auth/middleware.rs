/// Bearer-token authentication for Axum
///
/// Guarded routers run [`jwt_auth_middleware`] (or call [`authenticate`]
/// from their own layer). On success an [`AuthContext`] is inserted into the
/// request extensions; on failure the handler is never invoked and the
/// request is answered with 401.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use hostkeep_shared::auth::middleware::{jwt_auth_middleware, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     auth.username
/// }
///
/// let secret = "a-secret-that-is-at-least-32-bytes!!".to_string();
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(move |req, next| {
///         jwt_auth_middleware(secret.clone(), req, next)
///     }));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};

/// Identity of the caller, decoded from the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            first_name: claims.first_name,
            last_name: claims.last_name,
            email: claims.email,
        }
    }
}

impl AuthContext {
    /// True when the caller is the given user
    pub fn is(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Why a request was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("Expected Bearer token")]
    InvalidFormat,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::Expired,
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extracts and validates the bearer token in `headers`
///
/// # Errors
///
/// Any [`AuthError`]; all of them map to 401
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?
        .trim();

    let claims = validate_token(token, secret)?;
    Ok(AuthContext::from(claims))
}

/// Middleware validating `Authorization: Bearer <token>`
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate(req.headers(), &secret)?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
