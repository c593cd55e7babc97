mod auth;
mod config;
mod server;

use crate::config::Config;
use crate::server::run_server;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "imgstore")]
#[command(about = "Content-addressed image storage server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Server {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Server port, overrides the configured bind address port
        #[arg(short, long)]
        port: Option<u16>,

        /// Storage directory
        #[arg(short, long)]
        storage: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "imgstore_server=info,imgstore_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        tracing::error!("{:#}", error);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Server {
            config,
            port,
            storage,
        } => {
            let mut cfg = Config::load(config.as_deref()).context("Failed to load config")?;
            if let Some(port) = port {
                cfg = cfg.with_port(port);
            }
            if let Some(storage) = storage {
                cfg = cfg.with_base_dir(storage);
            }

            tracing::info!(
                "Starting imgstore server. Bind: {}, Storage: {:?}, Shards: {}x{}",
                cfg.bind_addr,
                cfg.storage.base_dir,
                cfg.storage.shard_depth,
                cfg.storage.shard_width
            );

            run_server(cfg).await.context("Server error")?;
        }
    }

    Ok(())
}
