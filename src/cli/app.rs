use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "intake-cli")]
#[command(about = "A chat-style form that collects lead details and posts them to a webhook")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments used when no subcommand is given (implicit `run`)
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the conversational intake form (default)
    Run(RunArgs),
    /// Configuration management
    Config(ConfigCommands),
}

#[derive(Args, Default)]
pub struct RunArgs {
    /// Override the webhook endpoint for this run
    #[arg(long)]
    pub webhook_url: Option<String>,
}

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Print the resolved configuration
    Show,
    /// Write a config file with the default values
    Init,
    /// Print the config file location
    Path,
}
