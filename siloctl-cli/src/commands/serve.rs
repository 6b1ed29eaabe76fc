//! HTTP server command
//!
//! Builds the connection pool and runs the API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use siloctl_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use siloctl_server::db::{create_pool, DbConfig};
use siloctl_server::http::server::DEFAULT_PORT;
use siloctl_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// PostgreSQL connection string (falls back to PGHOST, PGUSER, ... when unset)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

/// Resolve `host:port` to the first matching socket address.
async fn resolve_bind(host: &str, port: u16) -> Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Failed to resolve bind address {host}:{port}"))?
        .next()
        .with_context(|| format!("No address found for {host}"))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bind_addr = resolve_bind(&args.host, args.port).await?;

    let db = DbConfig {
        database_url: args.database_url,
        max_connections: args.max_connections,
    };
    let pool = create_pool(&db)
        .await
        .context("Failed to create database pool")?;

    run_server(pool, ServerConfig { bind_addr })
        .await
        .context("Server error")?;

    Ok(())
}
