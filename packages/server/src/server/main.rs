// Main entry point for the scrape server

use std::sync::Arc;

use anyhow::{Context, Result};
use post_extraction::PostExtractor;
use server_core::{
    kernel::{HttpPageFetcher, ServerDeps},
    server::build_app,
    Config,
};
use sheet_sync::{SheetsTabularStore, Synchronizer};
use sheets_client::{ServiceAccountKey, SheetsClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server_core=debug,sheet_sync=debug,post_extraction=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting blog scrape server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        tab = %config.destination_tab,
        policy = %config.sync_policy,
        "Configuration loaded"
    );

    // Sheets credentials are loaded once and shared by every request
    let key = ServiceAccountKey::from_file(&config.service_account_file).with_context(|| {
        format!(
            "Failed to load service account key from {}",
            config.service_account_file.display()
        )
    })?;
    tracing::info!(client_email = %key.client_email, "Service account loaded");

    let sheets = SheetsClient::with_service_account(key, config.store_timeout)
        .context("Failed to create Sheets client")?;
    let store = SheetsTabularStore::new(Arc::new(sheets));

    let server_deps = ServerDeps::new(
        Arc::new(HttpPageFetcher::new(config.fetch_timeout)?),
        PostExtractor::new(config.extractor_config()),
        Synchronizer::new(Arc::new(store), config.sync_config()),
    );

    // Build application
    let app = build_app(server_deps, config.request_timeout);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Scrape endpoint: POST http://localhost:{}/scrape", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
