//! DAO vote daemon: entry point for the HTTP API and offline tallies.

use anyhow::Context;
use clap::Parser;
use daovote_governance::TallyEngine;
use daovote_node::{init_logging, DaoNode, LogFormat, NodeConfig, StoreBackend};
use daovote_rpc::handlers::TallyReport;
use daovote_types::Transaction;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daovote-daemon", about = "DAO memo-vote tally service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DAOVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port.
    #[arg(long, env = "DAOVOTE_PORT")]
    port: Option<u16>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DAOVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DAOVOTE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Storage backend: "memory" or "lmdb".
    #[arg(long, env = "DAOVOTE_STORE")]
    store: Option<StoreBackend>,

    /// Data directory for the LMDB store.
    #[arg(long, env = "DAOVOTE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Manage the HTTP server.
    #[command(name = "server")]
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },
    /// Tally a JSON array of transactions against the configured voting
    /// power and print the report.
    Tally {
        /// File holding `[{"from": ..., "message": ..., "hash": ...}, ...]`.
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(clap::Subcommand)]
enum ServerAction {
    /// Run the server until SIGINT/SIGTERM.
    Run,
}

impl Cli {
    fn node_config(&self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)?,
            None => NodeConfig::default(),
        };
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if let Some(store) = self.store {
            config.store = store;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.node_config()?;

    match cli.command {
        Command::Server {
            action: ServerAction::Run,
        } => {
            init_logging(config.log_format()?, &config.log_level)?;
            if let Some(path) = &cli.config {
                tracing::info!(path = %path.display(), "loaded configuration");
            }
            tracing::info!(
                port = config.port,
                store = ?config.store,
                members = config.voting_power.len(),
                "starting DAO vote daemon"
            );

            let node = DaoNode::new(config)?;
            let shutdown = node.shutdown_controller();
            tokio::spawn(async move { shutdown.wait_for_signal().await });

            node.run().await?;
            tracing::info!("DAO vote daemon exited cleanly");
        }
        Command::Tally { input } => {
            // Warnings only, so stdout is left to the report.
            init_logging(LogFormat::Human, "warn")?;
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let transactions: Vec<Transaction> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", input.display()))?;

            let table = config.voting_power_table()?;
            let result = TallyEngine::new(config.tally_params()?).tally(&transactions, &table);
            println!("{}", serde_json::to_string_pretty(&TallyReport::from(&result))?);
        }
    }

    Ok(())
}
