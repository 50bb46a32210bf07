//! Server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, so a bare `cargo run` starts a usable dev server.

use std::env;
use std::net::SocketAddr;

/// Which storage backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Durable SQLite file (default).
    Sqlite,
    /// Volatile in-memory store, for demos and local hacking.
    Memory,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// Storage backend selection
    pub backend: StoreBackend,

    /// SQLite database file path (ignored for the memory backend)
    pub database_path: String,

    /// Insert the demo catalogue on startup
    pub seed_demo_data: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))?;

        let backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .as_str()
        {
            "sqlite" => StoreBackend::Sqlite,
            "memory" => StoreBackend::Memory,
            _ => return Err(ConfigError::InvalidValue("STORE_BACKEND".to_string())),
        };

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "tally.db".to_string());

        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SEED_DEMO_DATA".to_string()))?;

        Ok(ServerConfig {
            bind_addr,
            backend,
            database_path,
            seed_demo_data,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
