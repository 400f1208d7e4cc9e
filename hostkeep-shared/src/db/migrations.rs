/// Embedded schema migrations
///
/// SQL files under `hostkeep-shared/migrations/` are compiled into the
/// binary with `sqlx::migrate!` and applied in timestamp order. Applied
/// versions are tracked in `_sqlx_migrations`.
///
/// # Example
///
/// ```no_run
/// use hostkeep_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use hostkeep_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example(url: String) -> Result<(), Box<dyn std::error::Error>> {
/// ensure_database_exists(&url).await?;
/// let pool = create_pool(DatabaseConfig { url, ..Default::default() }).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, error, info};

/// Applies every pending migration
///
/// # Errors
///
/// Returns the first failing migration's error; earlier ones stay applied
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        error!(error = %e, "Migration failed");
        e
    })?;

    info!("Database schema up to date");
    Ok(())
}

/// Number of successfully applied migrations
pub async fn applied_migrations(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await?;

    debug!(applied = count, "Migration status");
    Ok(count)
}

/// Creates the database named in `database_url` if missing
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }

    Ok(())
}
