//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Install optional metrics exporter (a failed install is fatal)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use axum::http::header::InvalidHeaderValue;
use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::{validate_config, ValidationError};
use crate::config::{ConfigError, ServerConfig};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Errors that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("invalid CORS policy: {0}")]
    Cors(#[from] InvalidHeaderValue),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Validate `config`, bind its listener and serve until `shutdown` fires.
pub async fn run(config: ServerConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    validate_config(&config).map_err(|errors| StartupError::Config(ConfigError::Validation(errors)))?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        out_prefix = %config.assets.out_prefix,
        extensions_prefix = %config.assets.extensions_prefix,
        websocket_origins = config.websocket.allowed_origins.len(),
        "Configuration loaded"
    );
    if config.cors.allow_origin == "*" && config.websocket.allowed_origins.is_empty() {
        tracing::warn!("Cross-origin policy and channel origin check accept any origin");
    }

    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        let addr = address.parse::<SocketAddr>().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: address.clone(),
            }])
        })?;
        metrics::init_metrics(addr)?;
    }

    let address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
