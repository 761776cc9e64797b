//! # Relay Node
//!
//! ```text
//! relay-node init  --repo <dir>   # write the default relay.toml
//! relay-node start --repo <dir>   # run until Ctrl+C
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relay_node::{init_logging, LogFormat, RelayConfig, RelayNode};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "relay-node", version, about = "Broker relay plugin")]
struct Cli {
    /// Log one JSON object per line.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default configuration.
    Init {
        /// Directory holding relay.toml.
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
    /// Start the relay.
    Start {
        /// Directory holding relay.toml.
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logging(format)?;

    match cli.command {
        Command::Init { repo } => {
            let path = RelayConfig::write_default(&repo)
                .with_context(|| format!("init config in {}", repo.display()))?;
            info!("[relay-node] Wrote {}", path.display());
        }
        Command::Start { repo } => {
            let config = RelayConfig::load(&repo)
                .with_context(|| format!("load config from {}", repo.display()))?;
            let node = RelayNode::new(config);
            let mut running = node.start().await.context("start relay")?;

            info!("[relay-node] Relay is running. Press Ctrl+C to stop.");
            tokio::select! {
                signal = tokio::signal::ctrl_c() => signal?,
                _ = async {
                    while let Some(ibtp) = running.ibtps.recv().await {
                        info!(
                            "[relay-node] IBTP {}-{}-{} ready for the hub",
                            ibtp.from, ibtp.to, ibtp.index
                        );
                    }
                } => {}
            }
            node.shutdown(running).await;
        }
    }
    Ok(())
}
