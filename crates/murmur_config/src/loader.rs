//! Configuration file loading.

use crate::error::ConfigError;
use crate::resolve::resolve_service;
use crate::types::{ConfigFile, ServiceConfig};
use std::path::Path;

/// File name looked up in a service directory.
pub const CONFIG_FILE_NAME: &str = "murmur.toml";

/// Loads and validates `<dir>/murmur.toml`.
pub fn load_config(dir: &Path) -> Result<ServiceConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ServiceConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve_service(file)
}
