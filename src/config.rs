//! Configuration management for Net Pulse
//!
//! This module provides configuration persistence for sampling cadence,
//! interface filtering and proxy detection settings.

use crate::error::{NetPulseError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Net Pulse configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Throughput sampling options
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Proxy detection options
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Throughput sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Sampling interval in milliseconds
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
    /// Number of interfaces reported per tick (capped at 3)
    #[serde(default = "default_top_interfaces")]
    pub top_interfaces: usize,
    /// Samples kept in each trend buffer
    #[serde(default = "default_trend_capacity")]
    pub trend_capacity: usize,
    /// Additional interface name prefixes treated as noise
    #[serde(default)]
    pub extra_noise_prefixes: Vec<String>,
}

/// Proxy detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Hard limit for the OS proxy query, in milliseconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,
    /// How often the aggregator re-runs detection, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Run the OS proxy query and tunnel heuristic where supported
    #[serde(default = "default_true")]
    pub system_query: bool,
}

// Default value functions
fn default_interval() -> u64 {
    1000 // 1 second
}

fn default_top_interfaces() -> usize {
    3
}

fn default_trend_capacity() -> usize {
    60
}

fn default_query_timeout() -> u64 {
    500
}

fn default_poll_interval() -> u64 {
    5000 // 5 seconds
}

fn default_true() -> bool {
    true
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            top_interfaces: default_top_interfaces(),
            trend_capacity: default_trend_capacity(),
            extra_noise_prefixes: Vec::new(),
        }
    }
}

impl SamplingConfig {
    /// Sampling interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout(),
            poll_interval_ms: default_poll_interval(),
            system_query: true,
        }
    }
}

impl ProxyConfig {
    /// OS proxy query timeout as a [`Duration`]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Detection poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Get the default configuration directory
    ///
    /// Returns `~/.config/netpulse` on Unix-like systems,
    /// or `%APPDATA%\netpulse` on Windows.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(windows) {
            std::env::var("APPDATA")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        } else {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from(".config"))
        };

        Ok(config_dir.join("netpulse"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_file = Self::default_path()?.join("config.toml");

        if !config_file.exists() {
            log::debug!("no config at {}, using defaults", config_file.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| NetPulseError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::default_path()?;
        std::fs::create_dir_all(&config_dir)?;
        self.save_to(&config_dir.join("config.toml"))
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| NetPulseError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sampling.interval_ms, 1000);
        assert_eq!(config.sampling.top_interfaces, 3);
        assert_eq!(config.sampling.trend_capacity, 60);
        assert!(config.sampling.extra_noise_prefixes.is_empty());
        assert_eq!(config.proxy.query_timeout(), Duration::from_millis(500));
        assert!(config.proxy.system_query);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized = Config::from_toml(&toml_str).unwrap();

        assert_eq!(
            config.sampling.interval_ms,
            deserialized.sampling.interval_ms
        );
        assert_eq!(
            config.proxy.poll_interval_ms,
            deserialized.proxy.poll_interval_ms
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [sampling]
            extra_noise_prefixes = ["vmnet", "docker"]

            [proxy]
            system_query = false
            "#,
        )
        .unwrap();

        assert_eq!(config.sampling.extra_noise_prefixes, vec!["vmnet", "docker"]);
        assert_eq!(config.sampling.top_interfaces, 3);
        assert!(!config.proxy.system_query);
        assert_eq!(config.proxy.query_timeout_ms, 500);
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let err = Config::from_toml("[sampling\ninterval_ms = ").unwrap_err();
        assert!(matches!(err, NetPulseError::Parse(_)));
    }
}
