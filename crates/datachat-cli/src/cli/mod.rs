//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use datachat_core::config;

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "datachat")]
#[command(version)]
#[command(about = "Chat with your data: upload a file, then ask questions about it")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides config and DATACHAT_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sends one query and prints the answer
    Ask {
        /// The question to ask
        #[arg(short, long)]
        query: String,

        /// Upload this file before asking
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Uploads a file for analysis
    Upload {
        /// File to upload (at most 10 MB)
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, base_url } = cli;
    let load_config = || -> Result<config::Config> {
        Ok(config::Config::load()
            .context("load config")?
            .with_base_url_override(base_url.clone()))
    };

    match command {
        // default to chat mode
        None => commands::chat::run(&load_config()?).await,
        Some(Commands::Ask { query, file }) => {
            commands::ask::run(&load_config()?, &query, file.as_deref()).await
        }
        Some(Commands::Upload { path }) => commands::upload::run(&load_config()?, &path).await,
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
