#![allow(warnings)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod form;
pub mod webhook;

use once_cell::sync::OnceCell;

// Global Config instance
static CONFIG: OnceCell<config::Config> = OnceCell::new();

/// Get a reference to the global Config
pub fn global_config() -> &'static config::Config {
    CONFIG.get().expect("Config not initialized")
}

/// Initialize the global Config (called once at startup)
pub fn init_config(config: config::Config) -> anyhow::Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Failed to initialize global Config"))
}
