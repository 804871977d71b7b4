//! Binary crate for the `weather-web` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving the HTML/JSON front end over HTTP
//! - Interactive configuration

use clap::Parser;

mod cli;
mod server;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
