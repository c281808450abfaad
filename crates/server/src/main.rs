use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mrt_history_server::{AppState, Config, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(corpus = %config.corpus.display(), "loading snapshot corpus");
    let store = mrt_topology::corpus::load_dir(&config.corpus)
        .with_context(|| format!("Failed to load corpus from {}", config.corpus.display()))?;

    // Nothing can be served from an empty store; treat it as a deployment defect
    if store.is_empty() {
        bail!("No snapshots found in {}", config.corpus.display());
    }

    let app = create_router(AppState {
        store,
        default_lang: config.default_lang,
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "serving network history");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
