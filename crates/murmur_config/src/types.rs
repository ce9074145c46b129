//! Configuration types deserialized from `murmur.toml`.

use murmur_common::{OptionValue, RequestOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Plugin identifier used when the configuration does not name one.
pub const DEFAULT_PLUGIN_ID: &str = "tts.amazon";

/// Backend API version forwarded in the default client options.
pub const CLIENT_VERSION: &str = "2016-06-10";

/// The configuration file as written on disk, before validation.
///
/// Option tables are kept as raw TOML values here; [`resolve_service`]
/// checks and converts them into a [`ServiceConfig`].
///
/// [`resolve_service`]: crate::resolve::resolve_service
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Service identity and cache settings.
    #[serde(default)]
    pub service: ServiceSection,
    /// Default request options applied to every synthesis call.
    #[serde(default)]
    pub request_options: BTreeMap<String, toml::Value>,
    /// Options forwarded verbatim to the backend constructor.
    #[serde(default)]
    pub client_options: BTreeMap<String, toml::Value>,
}

/// The `[service]` table.
#[derive(Debug, Deserialize)]
pub struct ServiceSection {
    /// Plugin identifier; also the name prefix of the cache directory.
    #[serde(default = "default_plugin_id")]
    pub plugin_id: String,
    /// Whether synthesized results are cached on disk.
    #[serde(default)]
    pub cache: bool,
    /// Root under which the cache directory lives. Defaults to the system
    /// temporary directory.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            plugin_id: default_plugin_id(),
            cache: false,
            cache_path: None,
        }
    }
}

fn default_plugin_id() -> String {
    DEFAULT_PLUGIN_ID.to_string()
}

/// A validated service configuration, built once when the service is
/// constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Plugin identifier; also the name prefix of the cache directory.
    pub plugin_id: String,
    /// Whether synthesized results are cached on disk.
    pub cache: bool,
    /// Explicit cache root, if configured.
    pub cache_path: Option<PathBuf>,
    /// Service-level default request options.
    pub request_options: RequestOptions,
    /// Opaque options for the backend connection.
    pub client_options: BTreeMap<String, toml::Value>,
}

impl ServiceConfig {
    /// Creates a configuration with built-in defaults and caching disabled.
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            cache: false,
            cache_path: None,
            request_options: default_request_options(),
            client_options: default_client_options(),
        }
    }

    /// Enables caching under the given root (or the system temp dir if `None`).
    pub fn with_cache(mut self, cache_path: Option<PathBuf>) -> Self {
        self.cache = true;
        self.cache_path = cache_path;
        self
    }

    /// Sets a service-level default request option.
    pub fn with_request_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Self {
        self.request_options.insert(key.into(), value.into());
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PLUGIN_ID)
    }
}

/// Request options every service starts from.
pub fn default_request_options() -> RequestOptions {
    let mut opts = RequestOptions::new();
    opts.insert("SampleRate".to_string(), OptionValue::Integer(16000));
    opts.insert(
        "OutputFormat".to_string(),
        OptionValue::String("ogg_vorbis".to_string()),
    );
    opts
}

/// Client options every service starts from.
pub fn default_client_options() -> BTreeMap<String, toml::Value> {
    let mut opts = BTreeMap::new();
    opts.insert(
        "version".to_string(),
        toml::Value::String(CLIENT_VERSION.to_string()),
    );
    opts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_section_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(file.service.plugin_id, DEFAULT_PLUGIN_ID);
        assert!(!file.service.cache);
        assert!(file.service.cache_path.is_none());
        assert!(file.request_options.is_empty());
    }

    #[test]
    fn new_config_has_builtin_defaults() {
        let config = ServiceConfig::new("tts.test");
        assert_eq!(config.plugin_id, "tts.test");
        assert_eq!(
            config.request_options["SampleRate"],
            OptionValue::Integer(16000)
        );
        assert_eq!(
            config.request_options["OutputFormat"],
            OptionValue::from("ogg_vorbis")
        );
        assert_eq!(
            config.client_options["version"].as_str(),
            Some(CLIENT_VERSION)
        );
    }

    #[test]
    fn builder_helpers() {
        let config = ServiceConfig::default()
            .with_cache(Some(PathBuf::from("/var/cache/murmur")))
            .with_request_option("VoiceId", "Joanna");
        assert!(config.cache);
        assert_eq!(
            config.cache_path.as_deref(),
            Some(std::path::Path::new("/var/cache/murmur"))
        );
        assert_eq!(config.request_options["VoiceId"], OptionValue::from("Joanna"));
    }
}
