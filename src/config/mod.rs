//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, ServerConfig, ListenConfig, MotdConfig)
//! - [`validation`]: Startup checks that report every problem at once

mod types;
mod validation;

pub use types::{Config, ConfigError, ListenConfig, MotdConfig, ServerConfig};
pub use validation::{ValidationError, validate};
