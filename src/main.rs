//! Slim JPG demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────────▶ http::server (request id, access log, X-Engine,
//!                        compression, body limit)
//!                              │
//!                              ▼
//!                        http::handlers ── GET /        → render::page (form)
//!                              │
//!                              └──────── POST /optimize
//!                                          │
//!                                          ▼
//!                                   upload::multipart (PartStream)
//!                                          │  first file part
//!                                          ▼
//!                                   optimizer (ImageOptimizer, blocking pool)
//!                                          │  OptimizationResult
//!                                          ▼
//!                                   render (explanation + data URIs)
//!     Client Response                      │
//!     ◀────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use slimjpg_web::config::{apply_env_overrides, load_config, AppConfig};
use slimjpg_web::observability::{logging, metrics};
use slimjpg_web::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "slimjpg-web")]
#[command(about = "Upload a picture and see it optimized", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    apply_env_overrides(&mut config);

    logging::init_logging(&config.observability.log_level);

    tracing::info!("slimjpg-web v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        port = config.listener.port,
        max_visual_diff = config.optimizer.max_visual_diff,
        max_file_weight_kb = ?config.optimizer.max_file_weight_kb,
        keep_metadata = ?config.optimizer.keep_metadata,
        mode = ?config.page.mode,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
