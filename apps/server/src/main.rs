//! # Tally POS Server
//!
//! HTTP API server for the billing backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally POS Server                               │
//! │                                                                         │
//! │  Client ───► axum router ───► handlers ───► Arc<dyn BillStore>         │
//! │                                                   │                     │
//! │                                     ┌─────────────┴──────────┐          │
//! │                                     ▼                        ▼          │
//! │                               SqliteStore              MemoryStore      │
//! │                               (tally.db)               (volatile)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration (environment variables)
//! | Variable         | Default          | Meaning                        |
//! |------------------|------------------|--------------------------------|
//! | `BIND_ADDR`      | `127.0.0.1:8000` | HTTP listen address            |
//! | `STORE_BACKEND`  | `sqlite`         | `sqlite` or `memory`           |
//! | `DATABASE_PATH`  | `tally.db`       | SQLite file path               |
//! | `SEED_DEMO_DATA` | `true`           | Insert demo catalogue on boot  |

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tally_store::{seed, BillStore, DbConfig, MemoryStore, SqliteStore};

use crate::config::{ServerConfig, StoreBackend};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides; default to info for our crates
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tally_server=info,tally_store=info")),
        )
        .with_target(true)
        .init();

    info!("Starting Tally POS server...");

    let config = ServerConfig::load()?;
    info!(
        addr = %config.bind_addr,
        backend = ?config.backend,
        "Configuration loaded"
    );

    let store: Arc<dyn BillStore> = match config.backend {
        StoreBackend::Sqlite => {
            let store =
                SqliteStore::new(DbConfig::new(&config.database_path)).await?;
            info!(path = %config.database_path, "SQLite store ready");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!("In-memory store ready (data will not survive a restart)");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_demo_data {
        let inserted = seed::seed_demo(store.as_ref()).await?;
        info!(inserted, "Demo catalogue checked");
    }

    let app = routes::router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
