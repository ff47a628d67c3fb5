use anyhow::Result;

use crate::cli::app::ConfigSubcommands;
use crate::config::Config;

pub fn config_command(command: ConfigSubcommands) -> Result<()> {
    match command {
        ConfigSubcommands::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigSubcommands::Init => {
            let path = Config::get_config_path()?;
            if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                Config::default().save()?;
                println!("Wrote default config to {}", path.display());
            }
        }
        ConfigSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
        }
    }
    Ok(())
}
