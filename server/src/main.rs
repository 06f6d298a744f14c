//! Voyage server binary.
//!
//! Loads configuration, connects to `PostgreSQL`, applies migrations and
//! serves the API until Ctrl+C or SIGTERM.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use voyage_core::environment::SystemClock;
use voyage_postgres::PostgresStore;
use voyage_server::{AppState, Config, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Voyage server...");

    let auth_config = config.auth_config();
    if auth_config.uses_dev_secret() {
        warn!("AUTH_JWT_SECRET is not set; signing tokens with the development secret");
    }
    if config.auth.admin_api_key.is_none() {
        warn!("ADMIN_API_KEY is not set; admin listings are open");
    }

    info!("Connecting to PostgreSQL...");
    let store = PostgresStore::connect(&config.database.url, &config.pool_config()).await?;
    if config.database.run_migrations {
        info!("Running migrations...");
        store.migrate().await?;
    }
    info!("✓ Database ready");

    let state = AppState::new(
        Arc::new(store),
        &auth_config,
        Arc::new(SystemClock),
        config.auth.admin_api_key.clone(),
    );
    let app = build_router(state, &config.server.uploads_dir);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "✓ Listening");

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::select! {
        result = server => result?,
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            error!(timeout_secs = shutdown_timeout.as_secs(), "Graceful shutdown timed out");
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
