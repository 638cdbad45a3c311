//! anfcli - Azure NetApp Files Provisioning Tool
//!
//! A command-line tool for provisioning Azure NetApp Files SMB volumes,
//! written in Rust for performance, safety, and reliability.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod cli;
mod config;
mod error;
mod netapp;
mod utils;

use crate::cli::Cli;
use crate::error::Result;

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the command
    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting anfcli");

    let config = config::load_config(cli.config.as_deref()).await?;

    // Execute the command
    cli.execute(config).await?;

    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anfcli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
