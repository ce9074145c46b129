//! Shared setup for the commands: configuration loading and request building.

use std::path::Path;
use std::sync::Arc;

use murmur_common::{OptionValue, RequestOptions};
use murmur_config::{load_config_file, ConfigError, ServiceConfig, CONFIG_FILE_NAME};
use murmur_synth::{CommandBackend, SynthesisRequest, Synthesizer};
use tracing::debug;

use crate::GlobalArgs;

/// Loads the service configuration.
///
/// An explicit `--config` path must exist. Otherwise `murmur.toml` in the
/// current directory is used if present, falling back to built-in defaults.
pub fn load_service_config(global: &GlobalArgs) -> Result<ServiceConfig, ConfigError> {
    load_service_config_in(global, Path::new("."))
}

/// Like [`load_service_config`], with an explicit working directory.
pub fn load_service_config_in(
    global: &GlobalArgs,
    dir: &Path,
) -> Result<ServiceConfig, ConfigError> {
    if let Some(path) = &global.config {
        debug!(path = %path, "loading configuration");
        return load_config_file(Path::new(path));
    }
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        debug!(path = %path.display(), "loading configuration");
        load_config_file(&path)
    } else {
        debug!("no {CONFIG_FILE_NAME} found, using defaults");
        Ok(ServiceConfig::default())
    }
}

/// Builds a synthesizer over the command backend named in `client_options`.
pub fn build_synthesizer(
    config: ServiceConfig,
) -> Result<Synthesizer, Box<dyn std::error::Error>> {
    let backend = CommandBackend::from_client_options(&config.client_options)?;
    Ok(Synthesizer::new(config, Arc::new(backend))?)
}

/// Builds a request from the text and `KEY=VALUE` pairs given on the command
/// line. Later pairs replace earlier ones with the same key.
pub fn build_request(text: &str, options: &[(String, String)]) -> SynthesisRequest {
    let options: RequestOptions = options
        .iter()
        .map(|(k, v)| (k.clone(), OptionValue::from(v.as_str())))
        .collect();
    SynthesisRequest {
        text: text.to_string(),
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            config,
        }
    }

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_service_config_in(&global(None), dir.path()).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn reads_config_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[service]\nplugin_id = \"tts.local\"\ncache = true\n",
        )
        .unwrap();
        let config = load_service_config_in(&global(None), dir.path()).unwrap();
        assert_eq!(config.plugin_id, "tts.local");
        assert!(config.cache);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = load_service_config_in(
            &global(Some(missing.to_string_lossy().into_owned())),
            dir.path(),
        );
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn build_request_collects_options() {
        let request = build_request(
            "Hello",
            &[
                ("SampleRate".to_string(), "8000".to_string()),
                ("SampleRate".to_string(), "16000".to_string()),
            ],
        );
        assert_eq!(request.text, "Hello");
        assert_eq!(request.options.len(), 1);
        assert_eq!(request.options["SampleRate"], OptionValue::from("16000"));
    }

    #[test]
    fn synthesizer_needs_a_program() {
        let result = build_synthesizer(ServiceConfig::default());
        assert!(result.is_err());
    }
}
