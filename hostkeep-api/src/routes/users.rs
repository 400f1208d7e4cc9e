/// User endpoints
///
/// # Endpoints
///
/// - `POST /users/register` - Register a new user (public)
/// - `POST /users/login` - Exchange credentials for a bearer token (public)
/// - `GET /users/profile` - The caller's own record
/// - `GET /users`, `GET /users/:id` - Read users
/// - `PUT /users/:id` - Update the caller's names and email
/// - `PUT /users/reset-password/:id` - Replace the caller's password
/// - `DELETE /users/:id` - Delete the caller's account

use super::{created, Created, Payload, RecordId};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use hostkeep_shared::auth::middleware::AuthContext;
use hostkeep_shared::models::user::{UpdateUser, User};
use hostkeep_shared::services::users::{
    self, LoginRequest, LoginResponse, RegisterUser, ResetPassword,
};

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /users/register
/// Content-Type: application/json
///
/// {
///   "firstName": "Rita",
///   "lastName": "Lopes",
///   "username": "rita",
///   "email": "rita@example.com",
///   "password": "…",
///   "passwordConfirmation": "…"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing field or mismatched confirmation
/// - `409 Conflict`: Username or email already exists
pub async fn register(
    State(state): State<AppState>,
    Payload(req): Payload<RegisterUser>,
) -> ApiResult<Json<Created<User>>> {
    let user = users::register(state.store(), req, state.auth_settings()).await?;
    Ok(created(user))
}

/// Login with username and password
///
/// # Response
///
/// ```json
/// { "token": "eyJ...", "user": { "id": "…", "username": "rita", … } }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Unknown username
/// - `401 Unauthorized`: Wrong password
pub async fn login(
    State(state): State<AppState>,
    Payload(req): Payload<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = users::login(state.store(), req, state.auth_settings()).await?;
    Ok(Json(response))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    Ok(Json(users::profile(state.store(), &auth).await?))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(users::list(state.store()).await?))
}

pub async fn get(State(state): State<AppState>, RecordId(id): RecordId) -> ApiResult<Json<User>> {
    Ok(Json(users::get(state.store(), id).await?))
}

/// Update the caller's own details
///
/// # Errors
///
/// - `403 Forbidden`: `:id` is not the caller
/// - `409 Conflict`: Email taken by another user
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    RecordId(id): RecordId,
    Payload(req): Payload<UpdateUser>,
) -> ApiResult<StatusCode> {
    users::update(state.store(), &auth, id, req).await?;
    Ok(StatusCode::OK)
}

pub async fn reset_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    RecordId(id): RecordId,
    Payload(req): Payload<ResetPassword>,
) -> ApiResult<StatusCode> {
    users::reset_password(state.store(), &auth, id, req, state.auth_settings()).await?;
    Ok(StatusCode::OK)
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
    users::remove(state.store(), &auth, id).await?;
    Ok(StatusCode::OK)
}
