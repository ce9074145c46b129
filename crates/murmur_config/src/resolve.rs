//! Service resolution: merging built-in defaults with the configuration file.

use crate::error::ConfigError;
use crate::types::{default_client_options, default_request_options, ConfigFile, ServiceConfig};
use murmur_common::OptionValue;

/// Resolves a parsed configuration file into a validated [`ServiceConfig`].
///
/// Built-in request and client options form the base and the file's tables
/// overlay them key by key. Request option values must be scalars; tables and
/// arrays are rejected because the backend only accepts string parameters.
pub fn resolve_service(file: ConfigFile) -> Result<ServiceConfig, ConfigError> {
    validate_plugin_id(&file.service.plugin_id)?;

    let mut request_options = default_request_options();
    for (key, value) in file.request_options {
        if key.is_empty() {
            return Err(ConfigError::ValidationError(
                "request option keys must not be empty".to_string(),
            ));
        }
        let value = scalar_option(&key, value)?;
        request_options.insert(key, value);
    }

    let mut client_options = default_client_options();
    client_options.extend(file.client_options);

    Ok(ServiceConfig {
        plugin_id: file.service.plugin_id,
        cache: file.service.cache,
        cache_path: file.service.cache_path,
        request_options,
        client_options,
    })
}

/// The plugin id becomes a directory-name prefix, so it must be a plain name.
fn validate_plugin_id(plugin_id: &str) -> Result<(), ConfigError> {
    if plugin_id.is_empty() {
        return Err(ConfigError::MissingField("service.plugin_id".to_string()));
    }
    if plugin_id == "." || plugin_id == ".." || plugin_id.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError(format!(
            "plugin_id '{plugin_id}' must not contain path separators"
        )));
    }
    Ok(())
}

fn scalar_option(key: &str, value: toml::Value) -> Result<OptionValue, ConfigError> {
    match value {
        toml::Value::String(s) => Ok(OptionValue::String(s)),
        toml::Value::Integer(i) => Ok(OptionValue::Integer(i)),
        toml::Value::Float(f) => Ok(OptionValue::Float(f)),
        toml::Value::Boolean(b) => Ok(OptionValue::Bool(b)),
        toml::Value::Datetime(dt) => Ok(OptionValue::String(dt.to_string())),
        toml::Value::Array(_) | toml::Value::Table(_) => Err(ConfigError::ValidationError(
            format!("request option '{key}' must be a string, number or boolean"),
        )),
    }
}
