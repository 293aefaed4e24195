//! imgcached, the image search caching proxy daemon.
//!
//! Serves `GET /api/images` over HTTP, answering from the cache when it can
//! and from the upstream provider otherwise.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use imgcache::ClientRateLimiter;
use imgcache::server::config::{Config, Secrets};
use imgcache::server::{AppState, router};

/// Caching proxy for image search APIs.
#[derive(Parser)]
#[command(name = "imgcached")]
#[command(version = imgcache::PKG_VERSION)]
#[command(about = "Caching reverse proxy for image search APIs")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to, overriding the configuration file.
    #[arg(short, long, env = "IMGCACHE_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside development.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    let secrets = Secrets::load()?;

    let state = AppState::from_config(&config, &secrets).await?;
    spawn_limiter_pruning(Arc::clone(&state.limiter), config.rate_limit.window());

    let addr: SocketAddr = config.server.address.parse().map_err(|e| {
        imgcache::ImgcacheError::Configuration(format!("Invalid address: {e}"))
    })?;

    info!(
        version = imgcache::version_string(),
        %addr,
        cache = ?config.cache.backend,
        ttl_secs = config.cache.ttl_secs,
        "imgcached starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("imgcached stopped");
    Ok(())
}

/// Periodically forget clients whose quota has fully replenished.
fn spawn_limiter_pruning(limiter: Arc<ClientRateLimiter>, window: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(window.max(std::time::Duration::from_secs(1)));
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
