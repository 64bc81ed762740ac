//! attendsync library root.
//! Offline-first attendance record store and sync-reconciliation engine,
//! plus the CLI parser and the high-level run() used by the binary.

pub mod cli;
pub mod config;
pub mod connectivity;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod remote;
pub mod session;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use core::AppContext;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: Config) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => cli::commands::init::handle(cli).await,
        Commands::Config { .. } => cli::commands::config::handle(cmd, &cfg),
        Commands::Capture { .. } => {
            cli::commands::capture::handle(cmd, &context(cli, cfg).await?).await
        }
        Commands::List { .. } => cli::commands::list::handle(cmd, &context(cli, cfg).await?).await,
        Commands::Pending => cli::commands::pending::handle(&context(cli, cfg).await?).await,
        Commands::Sync { .. } => cli::commands::sync::handle(cmd, &context(cli, cfg).await?).await,
        Commands::Remote { .. } => {
            cli::commands::remote::handle(cmd, &context(cli, cfg).await?).await
        }
        Commands::Watch { .. } => cli::commands::watch::handle(cmd, &context(cli, cfg).await?).await,
        Commands::Log { .. } => cli::commands::log::handle(cmd, &context(cli, cfg).await?).await,
    }
}

/// Open the store and wire the sync components for commands that need them.
async fn context(cli: &Cli, cfg: Config) -> AppResult<AppContext> {
    AppContext::build(cfg, cli.offline).await
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(dispatch(&cli, cfg))
}
