//! Configuration management for homebeat
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all application settings. It uses the `figment`
//! crate to layer defaults, a `homebeat.toml` file, environment variables,
//! and command-line arguments.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Seconds between heartbeat writes.
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 60;

/// Gaps at or below this many seconds are routine restarts, not outages.
pub const DEFAULT_OUTAGE_THRESHOLD_SECS: u64 = 120;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Discord credentials and target channel.
    pub discord: DiscordConfig,
    /// Heartbeat persistence and outage-detection settings.
    pub heartbeat: HeartbeatConfig,
}

/// Discord connection settings. Both fields are required; an empty value is
/// a startup-fatal configuration error.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DiscordConfig {
    /// The bot token used for both the gateway session and REST delivery.
    pub bot_token: String,
    /// The channel that receives notifications and answers status queries.
    pub channel_id: String,
}

/// Heartbeat persistence settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HeartbeatConfig {
    /// Path of the single-record heartbeat file.
    pub file: PathBuf,
    /// Seconds between heartbeat writes.
    pub interval_seconds: u64,
    /// Suppression threshold in seconds; larger gaps are reported as outages.
    pub outage_threshold_seconds: u64,
}

impl Config {
    /// Loads the application configuration by layering sources: defaults,
    /// the TOML file, `HOMEBEAT_`-prefixed environment variables (nested
    /// keys separated by `__`, e.g. `HOMEBEAT_DISCORD__BOT_TOKEN`), and
    /// CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("homebeat.toml"));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("HOMEBEAT_").split("__"))
            .merge(cli.clone())
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that cannot produce a working agent.
    fn validate(&self) -> Result<()> {
        if self.discord.bot_token.is_empty() {
            anyhow::bail!("discord.bot_token is required (set HOMEBEAT_DISCORD__BOT_TOKEN)");
        }
        if self.discord.channel_id.is_empty() {
            anyhow::bail!("discord.channel_id is required (set HOMEBEAT_DISCORD__CHANNEL_ID)");
        }
        if self.heartbeat.interval_seconds == 0 {
            anyhow::bail!("heartbeat.interval_seconds must be greater than zero");
        }
        Ok(())
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            discord: DiscordConfig {
                bot_token: String::new(),
                channel_id: String::new(),
            },
            heartbeat: HeartbeatConfig {
                file: PathBuf::from("last_seen.json"),
                interval_seconds: DEFAULT_HEARTBEAT_INTERVAL_SECS,
                outage_threshold_seconds: DEFAULT_OUTAGE_THRESHOLD_SECS,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_cadence() {
        let config = Config::default();
        assert_eq!(config.heartbeat.interval_seconds, 60);
        assert_eq!(config.heartbeat.outage_threshold_seconds, 120);
    }

    #[test]
    fn empty_credentials_fail_validation() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn populated_credentials_pass_validation() {
        let mut config = Config::default();
        config.discord.bot_token = "token".to_string();
        config.discord.channel_id = "123".to_string();
        assert!(config.validate().is_ok());
    }
}
