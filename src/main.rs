//! Replica health-probe aggregator.
//!
//! Serves `/check_replicas`, which resolves every IPv6 address behind the
//! configured target, probes each replica concurrently and returns one
//! aggregated JSON report.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────────────┐
//!                      │                    REPLICA PROBE                      │
//!                      │                                                       │
//!   GET /check_replicas│  ┌─────────┐   ┌──────────┐   ┌──────────┐            │
//!   ───────────────────┼─▶│  http   │──▶│ security │──▶│ resolver │ AAAA       │
//!                      │  │ server  │   │  gate    │   └────┬─────┘            │
//!                      │  └─────────┘   └──────────┘        │                  │
//!                      │                                    ▼                  │
//!                      │                              ┌──────────┐   GET       │
//!                      │                              │  fanout  │──────────┬──┼──▶ replica [a1]
//!                      │                              │ + prober │──────────┼──┼──▶ replica [a2]
//!                      │                              └────┬─────┘──────────┘  │     ...
//!                      │                                   ▼                   │
//!   JSON report        │  ┌──────────┐              ┌───────────┐             │
//!   ◀──────────────────┼──│ response │◀─────────────│ aggregate │             │
//!                      │  └──────────┘              └───────────┘             │
//!                      │                                                       │
//!                      │  config · observability · lifecycle                   │
//!                      └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use tokio::net::TcpListener;

use replica_probe::config::{load_config, ObservabilityConfig};
use replica_probe::http::HttpServer;
use replica_probe::lifecycle::wait_for_signal;
use replica_probe::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os("CONFIG_PATH").map(PathBuf::from);

    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Error loading configuration");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!("replica-probe v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        target_url = %config.target.url,
        port = config.listener.port,
        resolve_timeout_secs = config.timeouts.resolve_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_socket_addr() {
            Some(addr) => metrics::init_metrics(addr),
            None => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, wait_for_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
