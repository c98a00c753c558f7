//! Beacon Worker
//!
//! Off-chain workers for the task registry contract.
//!
//! Architecture:
//! - Configuration: Load settings from flags, environment or a `.env` file
//! - Repositories: Ledger, compute sandbox and completion service behind traits
//! - Services: Task resolution and metadata generation
//! - Scheduler: Sweep loop shared by both roles
//!
//! The responder answers pending tasks by running each item's code in the
//! compute sandbox. The updater describes items that lack a title or
//! description. Both poll the ledger, compute, and commit signed
//! transactions in a loop until stopped.

mod config;
mod error;
mod repository;
mod scheduler;
mod service;
mod timeout;

use anyhow::{Context, Result};
use beacon_client::{CompletionClient, ComputeClient, LedgerClient, SigningClient, Wallet};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, ConfigArgs};
use crate::repository::ChainLedger;
use crate::scheduler::{Responder, Sweep, SweepLoop, Updater};

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "Off-chain workers for the task registry contract", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Run a single sweep and exit
    #[arg(long, global = true)]
    once: bool,

    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Answer pending tasks using the compute sandbox
    Responder,
    /// Generate titles and descriptions for undescribed items
    Updater,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_args(cli.config)?;
    info!("Loaded configuration: {:?}", config);

    let ledger = Arc::new(connect_ledger(&config)?);
    info!("Signing as {}", ledger.signer_address());

    match cli.role {
        Role::Responder => {
            let compute = Arc::new(ComputeClient::new(config.compute_url.clone()));
            let worker = Responder::new(ledger, compute, config.call_timeout);
            drive(worker, &config, cli.once).await
        }
        Role::Updater => {
            let completion = Arc::new(
                CompletionClient::new(config.completion_url.clone(), config.api_key.clone())
                    .with_model(config.completion_model.clone()),
            );
            let worker = Updater::new(ledger, completion, config.call_timeout);
            drive(worker, &config, cli.once).await
        }
    }
}

fn connect_ledger(config: &Config) -> Result<ChainLedger> {
    let queries = LedgerClient::new(config.rpc_url.clone(), config.contract_address.clone());
    let wallet = Wallet::from_mnemonic(&config.mnemonic, &config.address_prefix)
        .context("Failed to derive signing key from MNEMONIC")?;
    let fee = config.fee()?;
    info!("Transaction fee: {}", fee);

    let signer = SigningClient::new(queries.clone(), wallet, fee)
        .context("Failed to initialize signing client")?;

    Ok(ChainLedger::new(queries, signer))
}

async fn drive<W: Sweep>(worker: W, config: &Config, once: bool) -> Result<()> {
    let role = worker.role();
    let sweep_loop = SweepLoop::new(worker, config.sweep_interval);

    if once {
        sweep_loop.run_once().await?;
        return Ok(());
    }

    tokio::select! {
        result = sweep_loop.run() => {
            if let Err(e) = &result {
                error!("{} stopped: {}", role, e);
            }
            result?;
        }
        _ = shutdown_signal() => {
            info!("Shutting down...");
        }
    }

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut terminate, mut interrupt) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(terminate), Ok(interrupt)) => (terminate, interrupt),
        _ => {
            error!("Failed to install signal handlers, falling back to ctrl-c");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = terminate.recv() => info!("Received SIGTERM"),
        _ = interrupt.recv() => info!("Received SIGINT"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received ctrl-c");
}

