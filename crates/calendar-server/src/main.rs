// Calendar API server
// Decision: Run against PostgreSQL when DATABASE_URL is set, in-memory otherwise

use anyhow::{Context, Result};
use calendar_server::storage::StorageBackend;
use calendar_server::{build_app, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calendar_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("calendar-server starting...");

    let config = ServerConfig::from_env();

    let db = match &config.database_url {
        Some(url) => StorageBackend::postgres(url)
            .await
            .context("Failed to connect to database")?,
        None => StorageBackend::in_memory(),
    };

    if db.is_dev_mode() {
        tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
    } else {
        db.migrate().await.context("Failed to run migrations")?;
        tracing::info!("Connected to database");
    }

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
    }

    let app = build_app(Arc::new(db), &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
