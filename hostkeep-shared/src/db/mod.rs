/// Database plumbing for the PostgreSQL store
///
/// - `pool`: connection pool and health check
/// - `migrations`: embedded schema migrations
///
/// Queries live next to their models in `crate::models`.

pub mod migrations;
pub mod pool;
