//! SchemeSage — welfare scheme Q&A server.

use std::sync::Arc;

use anyhow::Context;
use schemesage_core::SchemeSageConfig;
use schemesage_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
SchemeSage — welfare scheme Q&A server

Usage: schemesage [command]

Commands:
  (none)      Start the server
  check       Load the catalog and build the index, then exit
  help        Show this help message

Configuration is read from the environment (PORT, SCHEMESAGE_CATALOG,
SCHEMESAGE_EMBEDDER, SCHEMESAGE_PROFILE, ...).";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let command = std::env::args().nth(1);
    match command.as_deref() {
        None => {}
        Some("check" | "--check") => {
            let config = SchemeSageConfig::from_env().context("Invalid configuration")?;
            let engine = schemesage_runtime::bootstrap(&config)
                .with_context(|| format!("Failed to load {}", config.catalog_path.display()))?;
            println!(
                "{} schemes, dim={}, fingerprint={}",
                engine.corpus().len(),
                engine.index().dimension(),
                engine.corpus().fingerprint()
            );
            return Ok(());
        }
        Some("help" | "--help" | "-h") => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(other) => {
            anyhow::bail!("Unknown command: {other}. Use 'schemesage help' for usage.");
        }
    }

    let config = SchemeSageConfig::from_env().context("Invalid configuration")?;
    info!("Catalog: {}", config.catalog_path.display());

    let engine = schemesage_runtime::bootstrap(&config).context("Startup failed")?;
    let state = Arc::new(AppState::new(engine));
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("SchemeSage server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
