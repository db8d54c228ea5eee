//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Message of the Day sent after USER.
    #[serde(default)]
    pub motd: MotdConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname presented to clients; prefixes every server reply and every
    /// virtual user identity (e.g., "irclogd").
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Verbose logging when `RUST_LOG` is not set.
    #[serde(default)]
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            debug: false,
        }
    }
}

fn default_server_name() -> String {
    "irclogd".to_string()
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
    /// Longest accepted client line in bytes, terminator included.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
            max_line_len: default_max_line_len(),
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 6667))
}

fn default_max_line_len() -> usize {
    512
}

/// Message of the Day (MOTD) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MotdConfig {
    /// MOTD lines, one RPL_MOTD each.
    #[serde(default = "default_motd_lines")]
    pub lines: Vec<String>,
}

impl Default for MotdConfig {
    fn default() -> Self {
        Self {
            lines: default_motd_lines(),
        }
    }
}

fn default_motd_lines() -> Vec<String> {
    vec!["what's up?".to_string()]
}
