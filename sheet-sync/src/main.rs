mod api;
mod cli;
mod config;
mod server;
mod sync;
mod transform;

#[cfg(test)]
mod test_upstream;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    log::debug!("Loaded configuration: {:?}", config);

    cli.execute(config).await
}
