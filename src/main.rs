use anyhow::{Context, Result};
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use photo_portfolio::{
    app, commands,
    config::{AppConfig, Command},
    services::{object_store::R2Store, portfolio_service::PortfolioService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config (fails fast on missing credentials) ---
    let cfg = AppConfig::from_env_and_args()?;

    tracing::info!("Starting photo-portfolio with config: {:?}", cfg);

    // --- Initialize store + core service ---
    let store = R2Store::new(&cfg.store).context("building object store client")?;
    let service = PortfolioService::new(
        Arc::new(store),
        cfg.store.bucket_name.clone(),
        cfg.store.public_url.clone(),
        &cfg.manifest,
    );

    match &cfg.command {
        Command::Serve => {}
        Command::Generate { out } => {
            commands::generate_manifest_file(&service, out).await?;
            return Ok(());
        }
        Command::Usage => {
            commands::report_usage(&service).await?;
            return Ok(());
        }
    }

    // --- Build router ---
    let app = app(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
