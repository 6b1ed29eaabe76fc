//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. Connection
//! parameters come from `DATABASE_URL` when given, otherwise from the
//! libpq environment (`PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD`,
//! `PGDATABASE`).

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Pool configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL connection string; `None` falls back to `PG*` variables
    pub database_url: Option<String>,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DbConfig {
    /// Resolve connect options from the URL or the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `database_url` is not a valid connection string.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.database_url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()),
        }
    }
}

/// Create a PostgreSQL connection pool.
///
/// The pool is the only long-lived shared state of the server; build it
/// once at startup and hand it to [`crate::http::run_server`].
///
/// # Errors
///
/// Returns an error if the options are invalid or the first connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::default()).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    let options = config.connect_options()?;
    tracing::debug!(
        host = options.get_host(),
        database = options.get_database().unwrap_or_default(),
        max_connections = config.max_connections,
        "connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}
