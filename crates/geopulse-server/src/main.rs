use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

use geopulse_geo::LlmResolver;
use geopulse_server::{config::ServerConfig, routes, state::AppState};

#[derive(Debug, Parser)]
#[command(name = "geopulse-server", about = "Coordinate resolution service")]
struct Args {
    /// Listen address, overriding GEOPULSE_BIND.
    #[arg(long)]
    bind: Option<String>,
}

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Failed to bind geopulse-server listener on {addr}: port already in use. Stop the other service using this port or re-run with --bind to choose another address.",
            );
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to bind geopulse-server listener on {addr}"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let resolver = LlmResolver::new(config.resolver_config())
        .context("failed to build geocoding resolver")?;
    let state = AppState::new(Arc::new(resolver));
    let app = routes::router(state);

    let listener = bind_listener(&config.bind).await?;
    tracing::info!(addr = %config.bind, "geopulse-server listening");

    axum::serve(listener, app)
        .await
        .context("server exited with an error")?;

    Ok(())
}
