//! Command-line interface

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use crate::config::Config;
use crate::server::{self, ServerState};
use crate::sync::Syncer;

#[derive(Parser, Debug)]
#[command(name = "sheet-sync", version, about = "Sync Excel worksheet rows into a Webflow collection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve GET /sync (default)
    Serve {
        /// Listen port, overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run a single sync and exit
    Run,
}

impl Cli {
    pub async fn execute(self, mut config: Config) -> Result<()> {
        match self.command.unwrap_or(Commands::Serve { port: None }) {
            Commands::Serve { port } => {
                if let Some(port) = port {
                    config.port = port;
                }
                server::serve(Arc::new(ServerState::new(config))).await
            }
            Commands::Run => {
                let http = reqwest::Client::new();
                let report = Syncer::new(&http, &config)
                    .run()
                    .await
                    .context("Sync failed")?;
                info!("Run finished");
                println!(
                    "Synced {} of {} records to collection {}",
                    report.published, report.records, config.webflow.collection_id
                );
                Ok(())
            }
        }
    }
}
