//! Jobtrack API server binary.
//!
//! Prints `{"port": N}` to stdout once listening so scripts can discover an
//! ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use jobtrack_api::AppState;
use jobtrack_api::config::ApiConfig;
use jobtrack_core::store::{MemoryStore, PgStore};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "info,jobtrack_api=debug,jobtrack_core=debug";

/// How often expired rate-limit windows are dropped.
const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "jobtrack_api_server", about = "Jobtrack API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/jobtrack"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep all data in memory instead of PostgreSQL. Nothing survives a
    /// restart.
    #[arg(long, default_value_t = false)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the port message.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig::from_env();
    let bind_addr = format!("{}:{}", args.host, args.port);

    let state = if args.memory {
        warn!("using in-memory store; data is lost on exit");
        AppState::new(Arc::new(MemoryStore::new()), config)
    } else {
        info!(
            max_connections = args.max_connections,
            "configuring connection pool"
        );
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&args.database_url)
            .await?;

        info!("running database migrations");
        jobtrack_api::migrate(&pool).await?;

        AppState::new(Arc::new(PgStore::new(pool)), config)
    };

    let shutdown = CancellationToken::new();

    let limiter = state.limiter.clone();
    let prune_ct = shutdown.clone();
    let prune_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_PRUNE_INTERVAL);
        loop {
            tokio::select! {
                _ = prune_ct.cancelled() => break,
                _ = ticker.tick() => limiter.prune(),
            }
        }
    });

    let app = jobtrack_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let local_addr = listener.local_addr()?;

    println!("{}", serde_json::json!({ "port": local_addr.port() }));
    info!(addr = %local_addr, "REST API listening");

    let signal_ct = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
        }
        signal_ct.cancel();
    });

    let serve_ct = shutdown.clone();
    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { serve_ct.cancelled().await })
    .await;

    shutdown.cancel();
    let _ = prune_handle.await;

    result?;
    Ok(())
}
