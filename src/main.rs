//! Address risk service.
//!
//! Scores Solana addresses from a local blacklist, an activity source
//! (Helius) and an opt-in reputation source (GoPlus), and keeps an audit
//! trail of every assessment in SQLite.
//!
//! ```text
//!     POST /api/check
//!     ─────────────────▶ http ──▶ assessment ──┬──▶ storage (blacklist)
//!                                              ├──▶ sources::helius ──┐
//!                                              └──▶ sources::goplus ──┴─▶ cache
//!                                   scoring ◀──┘
//!                                   storage (history) ◀── one row per check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use address_risk::config::resolve_config;
use address_risk::http::HttpServer;
use address_risk::lifecycle::{self, Shutdown};
use address_risk::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "address-risk")]
#[command(about = "Solana address risk assessment API", long_about = None)]
struct Args {
    /// TOML config file; environment variables override it.
    #[arg(short, long, env = "RISK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "address-risk starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        rate_limit = config.rate_limit.enabled,
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

    let state = lifecycle::initialize(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    lifecycle::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(&config, state);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
