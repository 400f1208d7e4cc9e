/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use hostkeep_api::{app::{build_router, AppState}, config::Config};
/// use hostkeep_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::default()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use hostkeep_shared::auth::middleware::jwt_auth_middleware;
use hostkeep_shared::services::users::AuthSettings;
use hostkeep_shared::store::EntityStore;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,

    pub config: Arc<Config>,

    auth: Arc<AuthSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, config: Config) -> Self {
        let auth = Arc::new(config.auth.settings());
        Self {
            store,
            config: Arc::new(config),
            auth,
        }
    }

    /// Secret, token lifetime and hash cost for account operations
    pub fn auth_settings(&self) -> &AuthSettings {
        &self.auth
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                     (public)
/// ├── POST /users/register             (public)
/// ├── POST /users/login                (public)
/// ├── /users/                          profile, list, get, update, delete, reset-password
/// ├── /customers/  /houses/  /bookings/  /tasks/  /works/
/// │     POST / · GET / · GET /:id · PUT /:id · DELETE /:id
/// └── POST /maintenance/reconcile
/// ```
///
/// Everything outside the public routes sits behind the bearer-token guard.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/users/register", post(routes::users::register))
        .route("/users/login", post(routes::users::login));

    let user_routes = Router::new()
        .route("/", get(routes::users::list))
        .route("/profile", get(routes::users::profile))
        .route("/reset-password/:id", put(routes::users::reset_password))
        .route(
            "/:id",
            get(routes::users::get)
                .put(routes::users::update)
                .delete(routes::users::remove),
        );

    let customer_routes = Router::new()
        .route(
            "/",
            post(routes::customers::create).get(routes::customers::list),
        )
        .route(
            "/:id",
            get(routes::customers::get)
                .put(routes::customers::update)
                .delete(routes::customers::remove),
        );

    let house_routes = Router::new()
        .route("/", post(routes::houses::create).get(routes::houses::list))
        .route(
            "/:id",
            get(routes::houses::get)
                .put(routes::houses::update)
                .delete(routes::houses::remove),
        );

    let booking_routes = Router::new()
        .route(
            "/",
            post(routes::bookings::create).get(routes::bookings::list),
        )
        .route(
            "/:id",
            get(routes::bookings::get)
                .put(routes::bookings::update)
                .delete(routes::bookings::remove),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create).get(routes::tasks::list))
        .route(
            "/:id",
            get(routes::tasks::get)
                .put(routes::tasks::update)
                .delete(routes::tasks::remove),
        );

    let work_routes = Router::new()
        .route("/", post(routes::works::create).get(routes::works::list))
        .route(
            "/:id",
            get(routes::works::get)
                .put(routes::works::update)
                .delete(routes::works::remove),
        );

    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/customers", customer_routes)
        .nest("/houses", house_routes)
        .nest("/bookings", booking_routes)
        .nest("/tasks", task_routes)
        .nest("/works", work_routes)
        .route(
            "/maintenance/reconcile",
            post(routes::maintenance::reconcile),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Validates the bearer token and injects `AuthContext` into the request
async fn jwt_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let secret = state.auth_settings().jwt_secret.clone();
    Ok(jwt_auth_middleware(secret, req, next).await?)
}
