/// Common test utilities for integration tests
///
/// Builds the full router over a fresh `MemoryStore`, registers and logs in
/// a user through the HTTP surface, and sends JSON requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hostkeep_api::app::{build_router, AppState};
use hostkeep_api::config::Config;
use hostkeep_shared::auth::password::HashParams;
use hostkeep_shared::store::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router and a logged-in user
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    pub user_id: String,
    pub token: String,
}

impl TestContext {
    /// Creates a router over an empty store and logs in user `staff`
    pub async fn new() -> Self {
        let mut config = Config::in_memory(JWT_SECRET);
        config.auth.hash = HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };

        let store = Arc::new(MemoryStore::default());
        let app = build_router(AppState::new(store.clone(), config));

        let mut ctx = Self {
            app,
            store,
            user_id: String::new(),
            token: String::new(),
        };

        let (status, body) = ctx.register("staff", "staff@hostkeep.test").await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        ctx.user_id = body["content"]["id"].as_str().unwrap().to_string();
        ctx.token = ctx.login("staff", "secret-password").await;
        ctx
    }

    pub async fn register(&self, username: &str, email: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/users/register",
            Some(json!({
                "firstName": "Test",
                "lastName": "Staff",
                "username": username,
                "email": email,
                "password": "secret-password",
                "passwordConfirmation": "secret-password"
            })),
            None,
        )
        .await
    }

    /// Logs in and returns the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/users/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Sends a request with the context user's token
    pub async fn authed(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(&self.token)).await
    }

    /// Sends a JSON request; an empty response body comes back as `Value::Null`
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// Creates a record and returns its id
    pub async fn create(&self, uri: &str, body: Value) -> String {
        let (status, response) = self.authed("POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::OK, "create {} failed: {}", uri, response);
        assert_eq!(response["success"], true);
        response["content"]["id"].as_str().unwrap().to_string()
    }
}
