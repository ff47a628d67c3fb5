#![allow(warnings)]

use anyhow::Result;
use clap::Parser;
use log::info;

use intake_cli::cli::{Cli, Commands};
use intake_cli::commands;
use intake_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize logger to file (truncate on each run); the TUI owns stdout
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("intake-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting intake-cli");

    // Initialize global Config once
    let config = Config::load()?;
    intake_cli::init_config(config)?;

    match cli.command {
        Some(Commands::Run(args)) => commands::chat::run_chat_form(args).await,
        Some(Commands::Config(config_args)) => commands::config_command(config_args.command),
        None => commands::chat::run_chat_form(cli.run).await,
    }
}
