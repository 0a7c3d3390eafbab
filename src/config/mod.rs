//! # Configuration Management Module
//!
//! Loads, validates and writes the responder's TOML configuration.
//!
//! ## Configuration Structure
//!
//! - [`ResponderConfig`] - pipeline settings (target channel, cooldown, dedup size)
//! - [`MeshtasticConfig`] - serial device settings
//! - [`LoggingConfig`] - log level and optional log file
//!
//! Every section and key is optional; anything missing falls back to the
//! defaults shown below.
//!
//! ## Configuration File Format
//!
//! ```toml
//! [responder]
//! target_channel = 4
//! rate_limit_seconds = 10
//! dedup_cache_size = 200
//!
//! [meshtastic]
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//! startup_sync_timeout_secs = 10
//! min_send_gap_ms = 2000
//!
//! [logging]
//! level = "info"
//! file = "meshresponder.log"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use meshresponder::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Listening on channel {}", config.responder.target_channel);
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

use crate::responder::dedup::DEFAULT_DEDUP_CAPACITY;

/// Highest channel index a Meshtastic radio exposes (channels 0..=7).
pub const MAX_CHANNEL_INDEX: u32 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub responder: ResponderConfig,
    #[serde(default)]
    pub meshtastic: MeshtasticConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Only packets on this channel index are answered.
    pub target_channel: u32,
    /// Minimum seconds between two replies to the same sender.
    pub rate_limit_seconds: u64,
    /// Number of recent packet signatures remembered for duplicate suppression.
    pub dedup_cache_size: usize,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            target_channel: 4,
            rate_limit_seconds: 10,
            dedup_cache_size: DEFAULT_DEDUP_CAPACITY,
        }
    }
}

impl ResponderConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshtasticConfig {
    pub port: String,
    pub baud_rate: u32,
    /// How long startup waits for the radio's config dump before capturing telemetry.
    pub startup_sync_timeout_secs: u64,
    /// Minimum gap between consecutive text sends (ms). Values below 2000 are raised to 2000.
    pub min_send_gap_ms: u64,
}

impl Default for MeshtasticConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115200,
            startup_sync_timeout_secs: 10,
            min_send_gap_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the responder cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.responder.target_channel > MAX_CHANNEL_INDEX {
            return Err(anyhow!(
                "responder.target_channel must be 0..={}, got {}",
                MAX_CHANNEL_INDEX,
                self.responder.target_channel
            ));
        }
        if self.responder.dedup_cache_size == 0 {
            return Err(anyhow!("responder.dedup_cache_size must be at least 1"));
        }
        if self.meshtastic.baud_rate == 0 {
            return Err(anyhow!("meshtastic.baud_rate must be non-zero"));
        }
        Ok(())
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}
