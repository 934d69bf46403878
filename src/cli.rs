//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using
//! the `clap` crate. These arguments are parsed at startup and then merged
//! with the configuration from the `homebeat.toml` file and environment
//! variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// A single-host liveness monitor with Discord outage recovery alerts.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path of the heartbeat record file.
    #[arg(long, value_name = "FILE")]
    pub heartbeat_file: Option<PathBuf>,

    /// Seconds between heartbeat writes.
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Outage suppression threshold in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub outage_threshold: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(path) = &self.heartbeat_file {
            dict.insert(
                "heartbeat.file".into(),
                Value::from(path.display().to_string()),
            );
        }

        if let Some(interval) = self.interval {
            dict.insert("heartbeat.interval_seconds".into(), Value::from(interval));
        }

        if let Some(threshold) = self.outage_threshold {
            dict.insert(
                "heartbeat.outage_threshold_seconds".into(),
                Value::from(threshold),
            );
        }

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
