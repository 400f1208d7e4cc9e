//! # Hostkeep API Server
//!
//! Serves the customer, house, booking, task, work and user endpoints over
//! either the PostgreSQL store or the in-memory store.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) DATABASE_URL=postgresql://... cargo run -p hostkeep-api
//! STORE_BACKEND=memory JWT_SECRET=... cargo run -p hostkeep-api
//! ```

use hostkeep_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use hostkeep_shared::db::{migrations, pool};
use hostkeep_shared::integrity;
use hostkeep_shared::store::{EntityStore, MemoryStore, PgStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hostkeep_api=debug,hostkeep_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Hostkeep API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let (store, pg_pool) = match config.store.backend {
        StoreBackend::Postgres => {
            migrations::ensure_database_exists(&config.store.database_url).await?;
            let pg_pool = pool::create_pool(pool::DatabaseConfig {
                url: config.store.database_url.clone(),
                max_connections: config.store.max_connections,
                ..Default::default()
            })
            .await?;
            migrations::run_migrations(&pg_pool).await?;
            let store: Arc<dyn EntityStore> = Arc::new(PgStore::new(pg_pool.clone()));
            (store, Some(pg_pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::default());
            (store, None)
        }
    };

    if config.reconcile_on_startup {
        let report = integrity::reconcile(store.as_ref()).await?;
        tracing::info!(repaired = report.total(), "Startup reconciliation done");
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg_pool) = pg_pool {
        pool::close_pool(pg_pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
