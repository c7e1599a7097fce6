//! Workbench host
//!
//! Single-port HTTP front end for a browser-hosted editor.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ────────────────┬──────────────────────────────────────────────────
//!                     │
//!          /out/*, /extensions/*          everything else
//!                     │                         │
//!              ┌──────▼──────┐           ┌──────▼──────┐
//!              │    cors     │           │  dispatcher │
//!              │   wrapper   │           └──┬───────┬──┘
//!              └──────┬──────┘    upgrade   │       │  plain request
//!              ┌──────▼──────┐   ┌──────────▼─┐  ┌──▼───────────────┐
//!              │  ServeDir   │   │ echo loop  │  │ template render  │
//!              │ (asset root)│   │ (1 task per│  │ + workbench JSON │
//!              └─────────────┘   │  channel)  │  └──────────────────┘
//!                                └────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use workbench_host::config::load_or_default;
use workbench_host::lifecycle::{signals, startup, Shutdown};
use workbench_host::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "workbench-host")]
#[command(about = "Serves a browser editor's bootstrap page, assets and duplex channel", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8080)
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the log level or filter directive
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }

    logging::init(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "workbench-host starting"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
