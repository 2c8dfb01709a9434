//! Catalog Gateway - Web Server Entry Point

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use catalog_gateway::{
    api::create_app,
    backend::ElasticsearchClient,
    config::{parse_duration, Config},
    logging,
    state::AppState,
};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "catalog-gateway", version, about = "Product search gateway for Elasticsearch")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated Elasticsearch node URLs
    #[arg(long)]
    nodes: Option<String>,

    /// How long to wait for the cluster at startup, e.g. `30s` or `500ms`
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    parse_duration(value)
        .ok_or_else(|| format!("invalid elasticsearch cluster connection timeout value: {value}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first to get logging settings
    let mut config = Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(cli.nodes.as_deref(), cli.timeout);

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.logging.deployment_environment,
        "Starting Catalog Gateway"
    );

    let addr = config
        .socket_addr()
        .context("Failed to determine socket address")?;

    tracing::info!(
        listen_addr = %addr,
        nodes = ?config.search.nodes,
        index = %config.search.index,
        "Configuration loaded"
    );

    if !config.auth.enabled {
        tracing::warn!("Authentication is DISABLED; every request to /v1 is accepted");
    }

    let client = ElasticsearchClient::new(&config.search)
        .context("Failed to create Elasticsearch client")?;

    let connect_timeout = config.search.connect_timeout();
    if !connect_timeout.is_zero() {
        tracing::info!(timeout = ?connect_timeout, "Waiting for Elasticsearch cluster");
        client
            .wait_until_ready(connect_timeout)
            .await
            .with_context(|| {
                format!("Elasticsearch cluster did not answer within {connect_timeout:?}")
            })?;
        tracing::info!("Elasticsearch cluster is reachable");
    }

    let state = AppState::new(config, Arc::new(client));
    let app = create_app(state);

    tracing::info!("Catalog Gateway listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API endpoint: http://{}/v1/products", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;

    if let Err(e) = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server terminated unexpectedly");
        return Err(e.into());
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
/// Docker sends SIGTERM, while Ctrl+C sends SIGINT
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to install SIGTERM signal handler");
    let sigint = tokio::signal::ctrl_c();

    tokio::select! {
        _ = sigint => {
            tracing::info!("SIGINT received, starting graceful shutdown...");
        }
        _ = sigterm.recv() => {
            tracing::info!("SIGTERM received, starting graceful shutdown...");
        }
    }
}

/// Wait for shutdown signal (SIGINT only on non-Unix platforms)
#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
