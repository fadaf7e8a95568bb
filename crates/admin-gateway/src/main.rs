//! Admin gateway binary.

use std::path::PathBuf;
use std::sync::Arc;

use admin_gateway::adapters::JsonRpcBackend;
use admin_gateway::{AdminGatewayService, GatewayConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// REST gateway for operator moderation actions
#[derive(Parser, Debug)]
#[command(name = "admin-gateway", version)]
#[command(about = "Forwards admin REST actions to the backend over JSON-RPC")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "ADMIN_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

fn init_logging(config: &GatewayConfig, force_json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("invalid log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if force_json || config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining in-flight requests");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = GatewayConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_logging(&config, args.log_json)?;
    match &args.config {
        Some(path) => info!(path = %path.display(), "Loaded gateway configuration file"),
        None => info!("No configuration file, using defaults and environment"),
    }

    let backend = JsonRpcBackend::new(&config.backend).context("creating backend client")?;
    info!(endpoint = backend.endpoint(), "Backend client ready");

    let service = AdminGatewayService::new(config, Arc::new(backend))?;
    service.run(shutdown_signal()).await?;

    Ok(())
}
