//! Birdie Server
//!
//! Live score keeping for badminton doubles matches over a JSON API.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use config::file::DatabaseConfig;
use config::{ConfigLoader, get_database_url};
use server::{build_router, run_server};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Birdie - badminton doubles match tracker
#[derive(Parser, Debug)]
#[command(name = "birdie-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "BIRDIE_CONFIG", default_value = "./birdie-config.toml")]
    config: PathBuf,

    /// Listen address, overriding `[server].listen` (e.g. 0.0.0.0:3000)
    #[arg(short, long, env = "BIRDIE_LISTEN")]
    listen: Option<SocketAddr>,

    /// Apply pending migrations from `migrations/` before serving
    #[arg(long)]
    migrate: bool,

    /// Log line format
    #[arg(long, env = "BIRDIE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting birdie-server");

    let config = ConfigLoader::new(&args.config, args.listen)
        .load()
        .inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;
    tracing::info!(path = ?args.config, "Configuration loaded");

    let pool = connect_database(&config.database).await?;
    if args.migrate {
        sqlx::migrate!("../migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        tracing::info!("Migrations applied");
    }

    let result = run_server(build_router(AppState::new(pool.clone())), config.server.listen).await;

    pool.close().await;
    tracing::info!("Database pool closed, bye");
    result.map_err(Into::into)
}

async fn connect_database(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let url = get_database_url()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&url)
        .await
        .context("connecting to DATABASE_URL")?;
    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
