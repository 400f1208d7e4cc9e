/// Configuration management for the API server
///
/// Loaded once at startup from environment variables (a `.env` file is read
/// first when present) and passed explicitly to the store and auth layers.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
/// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Token signing secret, at least 32 characters (required)
/// - `JWT_EXPIRATION_DAYS`: Token lifetime (default: 7)
/// - `PASSWORD_HASH_MEMORY_KIB`, `PASSWORD_HASH_ITERATIONS`,
///   `PASSWORD_HASH_PARALLELISM`: Argon2 cost (default: 65536 / 3 / 4)
/// - `RECONCILE_ON_STARTUP`: Rebuild derived data before serving (default: false)
///
/// # Example
///
/// ```no_run
/// use hostkeep_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use chrono::Duration;
use hostkeep_shared::auth::password::HashParams;
use hostkeep_shared::services::users::AuthSettings;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    pub store: StoreConfig,

    pub auth: AuthConfig,

    /// Run reconciliation before accepting requests
    pub reconcile_on_startup: bool,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Which [`EntityStore`](hostkeep_shared::store::EntityStore) backs the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown store backend '{0}' (expected 'postgres' or 'memory')")]
pub struct UnknownBackend(String);

impl FromStr for StoreBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// PostgreSQL connection URL; empty for the memory backend
    pub database_url: String,

    pub max_connections: u32,
}

/// Token and password settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub jwt_secret: String,

    pub token_ttl_days: i64,

    pub hash: HashParams,
}

impl AuthConfig {
    /// Settings handed to the account operations
    pub fn settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl: Duration::days(self.token_ttl_days),
            hash: self.hash,
        }
    }
}

fn parse_var<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e))
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - `DATABASE_URL` is missing while the postgres backend is selected
    /// - A numeric or boolean variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var::<u16>("API_PORT", "8080")?;
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let backend = parse_var::<StoreBackend>("STORE_BACKEND", "postgres")?;
        let database_url = match backend {
            StoreBackend::Postgres => env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            StoreBackend::Memory => env::var("DATABASE_URL").unwrap_or_default(),
        };
        let max_connections = parse_var::<u32>("DATABASE_MAX_CONNECTIONS", "10")?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let token_ttl_days = check_ttl_days(parse_var::<i64>("JWT_EXPIRATION_DAYS", "7")?)?;

        let defaults = HashParams::default();
        let hash = HashParams {
            memory_kib: parse_var("PASSWORD_HASH_MEMORY_KIB", &defaults.memory_kib.to_string())?,
            iterations: parse_var("PASSWORD_HASH_ITERATIONS", &defaults.iterations.to_string())?,
            parallelism: parse_var("PASSWORD_HASH_PARALLELISM", &defaults.parallelism.to_string())?,
        };

        let reconcile_on_startup = parse_var::<bool>("RECONCILE_ON_STARTUP", "false")?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            store: StoreConfig {
                backend,
                database_url,
                max_connections,
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_days,
                hash,
            },
            reconcile_on_startup,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Permissive configuration over the memory store, for tests and demos
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database_url: String::new(),
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: jwt_secret.into(),
                token_ttl_days: hostkeep_shared::auth::jwt::DEFAULT_TTL_DAYS,
                hash: HashParams::default(),
            },
            reconcile_on_startup: false,
        }
    }
}

/// Longest accepted token lifetime
pub const MAX_TTL_DAYS: i64 = 3650;

fn check_ttl_days(days: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_TTL_DAYS).contains(&days) {
        anyhow::bail!("JWT_EXPIRATION_DAYS must be between 1 and {}", MAX_TTL_DAYS);
    }
    Ok(days)
}
