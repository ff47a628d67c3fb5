use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::form::TypingTiming;

/// Endpoint used when no config file, env var, or flag provides one.
pub const DEFAULT_WEBHOOK_URL: &str = "https://webhook.triad3.io/webhook/colet-dados-2025";

/// Environment variable that overrides the configured webhook URL.
pub const WEBHOOK_URL_ENV: &str = "INTAKE_WEBHOOK_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
    #[serde(default = "default_branding_title")]
    pub branding_title: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub typing: TypingConfig,
}

/// Typing-indicator tuning. The reply delay gets up to `reply_jitter_ms`
/// of extra latency per answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingConfig {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    #[serde(default = "default_reply_jitter_ms")]
    pub reply_jitter_ms: u64,
}

fn default_webhook_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

fn default_branding_title() -> String {
    "Triad3 Inteligência Digital".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_reply_delay_ms() -> u64 {
    1200
}

fn default_reply_jitter_ms() -> u64 {
    400
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
            branding_title: default_branding_title(),
            request_timeout_secs: default_request_timeout_secs(),
            typing: TypingConfig::default(),
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            reply_delay_ms: default_reply_delay_ms(),
            reply_jitter_ms: default_reply_jitter_ms(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("intake-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".intake-cli")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file if present, then apply the env-var override.
    /// Missing file means defaults; a CLI flag override is applied by the
    /// caller on top of this.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        debug!("Loading config from: {:?}", config_path);

        let mut config = if config_path.exists() {
            let config_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&config_content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?
        } else {
            info!("Config file doesn't exist, using defaults");
            Self::default()
        };

        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            debug!("Overriding webhook URL from {}", WEBHOOK_URL_ENV);
            config.webhook_url = url;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        debug!("Saving config to: {:?}", config_path);

        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
                info!("Created config directory: {:?}", parent);
            }
        }

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn typing_timing(&self) -> TypingTiming {
        TypingTiming {
            initial: Duration::from_millis(self.typing.initial_delay_ms),
            reply: Duration::from_millis(self.typing.reply_delay_ms),
            jitter: Duration::from_millis(self.typing.reply_jitter_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_flow() {
        let config = Config::default();
        assert_eq!(config.webhook_url, DEFAULT_WEBHOOK_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.typing.initial_delay_ms, 1000);
        assert_eq!(config.typing.reply_delay_ms, 1200);
        assert_eq!(config.typing.reply_jitter_ms, 400);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("webhook_url = \"https://example.test/hook\"\n")
            .expect("partial config should parse");
        assert_eq!(config.webhook_url, "https://example.test/hook");
        assert_eq!(config.branding_title, default_branding_title());
        assert_eq!(config.typing.reply_delay_ms, 1200);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("parse");
        assert_eq!(parsed.webhook_url, config.webhook_url);
        assert_eq!(parsed.typing.reply_jitter_ms, config.typing.reply_jitter_ms);
    }
}
