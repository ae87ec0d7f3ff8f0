mod app;
mod cache;
mod config;
mod handlers;
mod mock_data;
mod preload;
mod state;
mod storage;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::Config,
    preload::{CachePreloader, PreloadRegistry, ScenarioPreloadJob},
    state::AppState,
    storage::cached::{spawn_stats_logger, CacheStats},
};

/// clientcache - Cache-aside read service for product services data
#[derive(Parser, Debug)]
#[command(name = "clientcache")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clientcache=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::debug!(
        cache_backend = ?config.cache_backend,
        cache_strategy = ?config.cache_strategy,
        storage_backend = ?config.storage_backend,
        preload_enabled = config.preload.enabled,
        "Loaded configuration"
    );

    let repository = storage::connect(&config).await?;
    let cache = cache::connect(&config).await;
    let stats = Arc::new(CacheStats::new());
    let records = storage::cached::with_strategy(
        &config,
        repository,
        Arc::clone(&cache),
        Arc::clone(&stats),
    );
    if let Some(every) = config.cache_stats_interval() {
        spawn_stats_logger(Arc::clone(&stats), every);
    }

    // Warm the cache in the background; requests are served meanwhile
    let mut registry = PreloadRegistry::new();
    registry.register(Arc::new(ScenarioPreloadJob::new(
        Arc::clone(&records),
        config.preload_scenarios.clone(),
    )));
    let preloader = CachePreloader::new(registry, config.preload.clone());
    let preload_status = preloader.status();
    preloader.spawn();

    let state = AppState::new(records, cache, config.cache_ttl(), preload_status, stats);

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
