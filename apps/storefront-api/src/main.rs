//! # Dokan Storefront API
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront API Server                            │
//! │                                                                         │
//! │  Browser ───► HTTP (3000) ───► Routes ───► Checkout ───► SQLite         │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                     Email API / SMTP (fallback)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use dokan_checkout::notify::EmailNotifier;
use dokan_db::{Database, DbConfig};
use dokan_storefront_api::auth::JwtManager;
use dokan_storefront_api::metrics::init_metrics;
use dokan_storefront_api::{build_router, AppState, StorefrontConfig};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dokan=debug,sqlx=warn")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Dokan storefront API...");

    let config = StorefrontConfig::load().context("Failed to load configuration")?;
    info!(
        addr = %config.bind_addr(),
        database = %config.database_path,
        currency = %config.currency,
        "Configuration loaded"
    );
    if config.uses_dev_secret() {
        warn!("DOKAN_JWT_SECRET not set, using the development secret");
    }

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections),
    )
    .await
    .context("Failed to open database")?;
    info!("Database ready");

    let notifier = EmailNotifier::from_config(config.email.api.clone(), config.email.smtp.clone())
        .context("Failed to configure order emails")?;
    let channels = notifier.enabled_channels();
    if channels.is_empty() {
        warn!("No email channel enabled, order confirmations will not be sent");
    } else {
        info!(?channels, "Order confirmation channels");
    }

    let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
    let mut state = AppState::new(db.clone(), Arc::new(notifier), jwt, config.currency.clone());

    match init_metrics() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!(error = %e, "Metrics recorder not installed"),
    }

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
