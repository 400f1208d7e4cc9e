//! Registration, login and self-service account operations
//!
//! ```text
//! unregistered ──register──▶ registered ──login──▶ authenticated (bearer token)
//! ```
//!
//! Tokens are stateless; "authenticated" lasts until the token expires.
//! Profile edits, password resets and account deletion act only on the
//! caller's own record.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::jwt::{self, Claims};
use crate::auth::middleware::AuthContext;
use crate::auth::password::{self, HashParams};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::models::EntityKind;
use crate::store::EntityStore;

const PASSWORD_MISMATCH: &str = "Password and passwordConfirmation do not match";

/// Secrets and costs used by the account operations
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HS256 signing secret
    pub jwt_secret: String,

    pub token_ttl: Duration,

    pub hash: HashParams,
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::days(jwt::DEFAULT_TTL_DAYS),
            hash: HashParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,

    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    pub password_confirmation: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

fn ensure_self(auth: &AuthContext, id: Uuid) -> ServiceResult<()> {
    if auth.is(id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "Cannot act on another user's account".to_string(),
        ))
    }
}

/// Registers a user with a freshly salted password hash
///
/// # Errors
///
/// - `Validation` on missing fields or mismatched confirmation
/// - `Conflict` when the username or email is taken
pub async fn register(
    store: &dyn EntityStore,
    data: RegisterUser,
    settings: &AuthSettings,
) -> ServiceResult<User> {
    data.validate()?;
    if data.password != data.password_confirmation {
        return Err(ServiceError::validation(PASSWORD_MISMATCH));
    }

    if store.find_user_by_username(&data.username).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Username '{}' already exists",
            data.username.to_lowercase()
        )));
    }
    if store.find_user_by_email(&data.email).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Email '{}' already exists",
            data.email.to_lowercase()
        )));
    }

    let password_hash = password::hash_password(&data.password, &settings.hash)?;

    // unique constraints still catch a concurrent duplicate
    let user = store
        .create_user(CreateUser {
            first_name: data.first_name,
            last_name: data.last_name,
            username: data.username,
            email: data.email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Verifies credentials and issues a bearer token
///
/// # Errors
///
/// - `NotFound` for an unknown username
/// - `Auth` for a wrong password
pub async fn login(
    store: &dyn EntityStore,
    data: LoginRequest,
    settings: &AuthSettings,
) -> ServiceResult<LoginResponse> {
    data.validate()?;

    let user = store
        .find_user_by_username(&data.username)
        .await?
        .ok_or_else(|| ServiceError::NotFound {
            kind: EntityKind::User,
            id: data.username.to_lowercase(),
        })?;

    if !password::verify_password(&data.password, &user.password_hash)? {
        info!(user_id = %user.id, "Login rejected");
        return Err(ServiceError::Auth("Invalid credentials".to_string()));
    }

    let claims = Claims::for_user(&user, settings.token_ttl)?;
    let token = jwt::create_token(&claims, &settings.jwt_secret)?;

    let user = store
        .find_user(user.id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::User, user.id))?;

    info!(user_id = %user.id, "User logged in");
    Ok(LoginResponse { token, user })
}

/// The caller's own record
pub async fn profile(store: &dyn EntityStore, auth: &AuthContext) -> ServiceResult<User> {
    get(store, auth.user_id).await
}

pub async fn list(store: &dyn EntityStore) -> ServiceResult<Vec<User>> {
    Ok(store.list_users().await?)
}

pub async fn get(store: &dyn EntityStore, id: Uuid) -> ServiceResult<User> {
    store
        .find_user(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(EntityKind::User, id))
}

/// Updates the caller's names and email
pub async fn update(
    store: &dyn EntityStore,
    auth: &AuthContext,
    id: Uuid,
    update: UpdateUser,
) -> ServiceResult<User> {
    ensure_self(auth, id)?;
    update.validate()?;

    let mut user = get(store, id).await?;

    if let Some(email) = update.email.as_deref() {
        if email.to_lowercase() != user.email {
            if let Some(holder) = store.find_user_by_email(email).await? {
                if holder.id != id {
                    return Err(ServiceError::Conflict(format!(
                        "Email '{}' already exists",
                        email
                    )));
                }
            }
        }
    }

    user.apply(update);
    if !store.update_user(&user).await? {
        return Err(ServiceError::not_found(EntityKind::User, id));
    }

    Ok(user)
}

/// Re-hashes the caller's password with a fresh salt
pub async fn reset_password(
    store: &dyn EntityStore,
    auth: &AuthContext,
    id: Uuid,
    data: ResetPassword,
    settings: &AuthSettings,
) -> ServiceResult<()> {
    ensure_self(auth, id)?;
    data.validate()?;
    if data.password != data.password_confirmation {
        return Err(ServiceError::validation(PASSWORD_MISMATCH));
    }

    let password_hash = password::hash_password(&data.password, &settings.hash)?;
    if !store.set_password_hash(id, &password_hash).await? {
        return Err(ServiceError::not_found(EntityKind::User, id));
    }

    info!(user_id = %id, "Password reset");
    Ok(())
}

/// Deletes the caller's account
pub async fn remove(store: &dyn EntityStore, auth: &AuthContext, id: Uuid) -> ServiceResult<()> {
    ensure_self(auth, id)?;

    if !store.delete_user(id).await? {
        return Err(ServiceError::not_found(EntityKind::User, id));
    }

    info!(user_id = %id, "User deleted");
    Ok(())
}
