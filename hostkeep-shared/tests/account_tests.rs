/// Registration, login and self-service account flows

use chrono::Duration;
use hostkeep_shared::auth::jwt::validate_token;
use hostkeep_shared::auth::middleware::AuthContext;
use hostkeep_shared::auth::password::HashParams;
use hostkeep_shared::error::ServiceError;
use hostkeep_shared::models::user::{UpdateUser, User};
use hostkeep_shared::services::users::{
    self, AuthSettings, LoginRequest, RegisterUser, ResetPassword,
};
use hostkeep_shared::store::MemoryStore;

const SECRET: &str = "account-test-secret";

fn settings() -> AuthSettings {
    AuthSettings {
        hash: HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
        ..AuthSettings::new(SECRET)
    }
}

fn registration(username: &str, email: &str) -> RegisterUser {
    RegisterUser {
        first_name: "Rita".to_string(),
        last_name: "Lopes".to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
        password_confirmation: "correct horse".to_string(),
    }
}

fn login_as(username: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

fn context(user: &User) -> AuthContext {
    AuthContext {
        user_id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
    }
}

#[tokio::test]
async fn test_register_then_login_issues_week_long_token() {
    let store = MemoryStore::default();
    let settings = settings();

    let user = users::register(&store, registration("Rita", "rita@hostkeep.test"), &settings)
        .await
        .unwrap();
    assert_eq!(user.username, "rita");
    assert_ne!(user.password_hash, "correct horse");

    let response = users::login(&store, login_as("RITA", "correct horse"), &settings)
        .await
        .unwrap();
    assert_eq!(response.user.id, user.id);

    let claims = validate_token(&response.token, SECRET).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.username, "rita");
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);

    let json = serde_json::to_value(&response.user).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_mismatch() {
    let store = MemoryStore::default();
    let settings = settings();

    users::register(&store, registration("rita", "rita@hostkeep.test"), &settings)
        .await
        .unwrap();

    let same_username = users::register(&store, registration("Rita", "other@hostkeep.test"), &settings).await;
    assert!(matches!(same_username, Err(ServiceError::Conflict(_))));

    let same_email = users::register(&store, registration("other", "rita@hostkeep.test"), &settings).await;
    assert!(matches!(same_email, Err(ServiceError::Conflict(_))));

    let mut mismatch = registration("third", "third@hostkeep.test");
    mismatch.password_confirmation = "something else".to_string();
    let result = users::register(&store, mismatch, &settings).await;
    assert!(matches!(result, Err(ServiceError::Validation { .. })));
}

#[tokio::test]
async fn test_emails_compare_case_insensitively() {
    let store = MemoryStore::default();
    let settings = settings();

    let rita = users::register(&store, registration("rita", "Rita@Hostkeep.test"), &settings)
        .await
        .unwrap();
    assert_eq!(rita.email, "rita@hostkeep.test");

    let same_email = users::register(&store, registration("other", "rita@hostkeep.test"), &settings).await;
    assert!(matches!(same_email, Err(ServiceError::Conflict(_))));

    let other = users::register(&store, registration("other", "other@hostkeep.test"), &settings)
        .await
        .unwrap();
    let taken = UpdateUser {
        email: Some("RITA@hostkeep.test".to_string()),
        ..Default::default()
    };
    let result = users::update(&store, &context(&other), other.id, taken).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));

    let own = UpdateUser {
        email: Some("RITA@HOSTKEEP.TEST".to_string()),
        ..Default::default()
    };
    let updated = users::update(&store, &context(&rita), rita.id, own).await.unwrap();
    assert_eq!(updated.email, "rita@hostkeep.test");
}

#[tokio::test]
async fn test_login_with_unrepresentable_lifetime_fails_cleanly() {
    let store = MemoryStore::default();
    let settings = AuthSettings {
        token_ttl: Duration::days(100_000_000),
        ..settings()
    };
    users::register(&store, registration("rita", "rita@hostkeep.test"), &settings)
        .await
        .unwrap();

    let result = users::login(&store, login_as("rita", "correct horse"), &settings).await;
    assert!(matches!(result, Err(ServiceError::Jwt(_))));
}

#[tokio::test]
async fn test_login_failures() {
    let store = MemoryStore::default();
    let settings = settings();
    users::register(&store, registration("rita", "rita@hostkeep.test"), &settings)
        .await
        .unwrap();

    let unknown = users::login(&store, login_as("nobody", "correct horse"), &settings).await;
    assert!(matches!(unknown, Err(ServiceError::NotFound { .. })));

    let wrong = users::login(&store, login_as("rita", "wrong"), &settings).await;
    assert!(matches!(wrong, Err(ServiceError::Auth(_))));
}

#[tokio::test]
async fn test_account_operations_are_self_only() {
    let store = MemoryStore::default();
    let settings = settings();
    let rita = users::register(&store, registration("rita", "rita@hostkeep.test"), &settings)
        .await
        .unwrap();
    let other = users::register(&store, registration("other", "other@hostkeep.test"), &settings)
        .await
        .unwrap();
    let auth = context(&rita);

    let update = UpdateUser {
        first_name: Some("Ana".to_string()),
        ..Default::default()
    };
    let result = users::update(&store, &auth, other.id, update.clone()).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    let result = users::remove(&store, &auth, other.id).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    let updated = users::update(&store, &auth, rita.id, update).await.unwrap();
    assert_eq!(updated.first_name, "Ana");
    assert_eq!(users::profile(&store, &auth).await.unwrap().first_name, "Ana");

    let taken = UpdateUser {
        email: Some("other@hostkeep.test".to_string()),
        ..Default::default()
    };
    let result = users::update(&store, &auth, rita.id, taken).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn test_reset_password_replaces_credentials() {
    let store = MemoryStore::default();
    let settings = settings();
    let rita = users::register(&store, registration("rita", "rita@hostkeep.test"), &settings)
        .await
        .unwrap();
    let auth = context(&rita);

    users::reset_password(
        &store,
        &auth,
        rita.id,
        ResetPassword {
            password: "battery staple".to_string(),
            password_confirmation: "battery staple".to_string(),
        },
        &settings,
    )
    .await
    .unwrap();

    let old = users::login(&store, login_as("rita", "correct horse"), &settings).await;
    assert!(matches!(old, Err(ServiceError::Auth(_))));
    assert!(users::login(&store, login_as("rita", "battery staple"), &settings)
        .await
        .is_ok());

    users::remove(&store, &auth, rita.id).await.unwrap();
    assert!(users::get(&store, rita.id).await.is_err());
}
