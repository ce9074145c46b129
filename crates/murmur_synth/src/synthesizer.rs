//! The synthesize-with-cache orchestrator.

use std::sync::Arc;

use murmur_cache::{resolve_root, CacheStore, DirCacheStore};
use murmur_common::{CacheEntry, CanonicalOptions, Fingerprint, OptionValue, RequestOptions};
use murmur_config::ServiceConfig;
use tracing::debug;

use crate::backend::SpeechBackend;
use crate::error::SynthesisError;
use crate::gateway::SynthesisGateway;
use crate::normalize::normalize;
use crate::validate::{validate, ValidationError};

/// A single synthesis call: the text and its per-call options.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Text or speech markup to synthesize.
    pub text: String,
    /// Per-call options; these win over the service defaults.
    pub options: RequestOptions,
}

impl SynthesisRequest {
    /// Creates a request with no per-call options.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: RequestOptions::new(),
        }
    }

    /// Adds a per-call option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Validates a request, merges it over `service_defaults` and fingerprints
/// the result.
///
/// This is the part of the synthesis path that touches neither the cache nor
/// the backend; the fingerprint is the request id the entry is cached under.
pub fn prepare_request(
    request: &SynthesisRequest,
    service_defaults: &RequestOptions,
) -> Result<(CanonicalOptions, Fingerprint), ValidationError> {
    validate(&request.text)?;
    let options = normalize(&request.text, &request.options, service_defaults);
    let fingerprint = Fingerprint::of_options(&options);
    Ok((options, fingerprint))
}

/// Runs requests through validation, normalization, fingerprinting, the cache
/// and the backend.
///
/// The cache is only consulted and written when the service configuration
/// enables it; otherwise every request reaches the backend.
pub struct Synthesizer {
    config: ServiceConfig,
    gateway: SynthesisGateway,
    cache: Option<Box<dyn CacheStore>>,
}

impl Synthesizer {
    /// Creates a synthesizer, opening the directory-scan cache store when
    /// caching is enabled.
    pub fn new(
        config: ServiceConfig,
        backend: Arc<dyn SpeechBackend>,
    ) -> Result<Self, SynthesisError> {
        let cache = if config.cache {
            let root = resolve_root(config.cache_path.as_deref());
            let store = DirCacheStore::open(&root, &config.plugin_id)?;
            Some(Box::new(store) as Box<dyn CacheStore>)
        } else {
            None
        };
        Ok(Self {
            config,
            gateway: SynthesisGateway::new(backend),
            cache,
        })
    }

    /// Creates a synthesizer over a caller-provided cache store.
    ///
    /// The store is still only used when caching is enabled in `config`.
    pub fn with_store(
        config: ServiceConfig,
        backend: Arc<dyn SpeechBackend>,
        store: Box<dyn CacheStore>,
    ) -> Self {
        let cache = config.cache.then_some(store);
        Self {
            config,
            gateway: SynthesisGateway::new(backend),
            cache,
        }
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the cache store, if caching is enabled.
    pub fn cache(&self) -> Option<&dyn CacheStore> {
        self.cache.as_deref()
    }

    /// Validates and normalizes a request and computes its fingerprint
    /// without touching the cache or the backend.
    pub fn prepare(
        &self,
        request: &SynthesisRequest,
    ) -> Result<(CanonicalOptions, Fingerprint), SynthesisError> {
        Ok(prepare_request(request, &self.config.request_options)?)
    }

    /// Synthesizes a request, serving it from the cache when possible.
    pub fn synthesize(&self, request: &SynthesisRequest) -> Result<CacheEntry, SynthesisError> {
        let (options, fingerprint) = self.prepare(request)?;

        if let Some(cache) = &self.cache {
            if let Some(entry) = cache.lookup(&fingerprint)? {
                debug!(request_id = %fingerprint, "served from cache");
                return Ok(entry);
            }
        }

        let entry = self.gateway.invoke(&request.text, &options, &fingerprint)?;

        if let Some(cache) = &self.cache {
            cache.store(&fingerprint, &entry)?;
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, SynthesizedAudio};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl SpeechBackend for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn synthesize(
            &self,
            text: &str,
            _options: &CanonicalOptions,
        ) -> Result<SynthesizedAudio, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SynthesizedAudio {
                audio: text.as_bytes().to_vec(),
                content_type: "audio/ogg".to_string(),
            })
        }
    }

    #[test]
    fn request_builder() {
        let request = SynthesisRequest::new("Hello").with_option("SampleRate", "16000");
        assert_eq!(request.text, "Hello");
        assert_eq!(request.options["SampleRate"], OptionValue::from("16000"));
    }

    #[test]
    fn prepare_normalizes_with_service_defaults() {
        let synth = Synthesizer::new(ServiceConfig::default(), Arc::new(Counting::default()))
            .unwrap();
        let request = SynthesisRequest::new("Hello").with_option("SampleRate", "16000");
        let (options, fingerprint) = synth.prepare(&request).unwrap();
        assert_eq!(options.get("Text"), Some("Hello"));
        assert_eq!(options.get("SampleRate"), Some("16000"));
        assert_eq!(options.get("OutputFormat"), Some("ogg_vorbis"));
        assert_eq!(fingerprint.to_string().len(), 40);
    }

    #[test]
    fn prepare_matches_free_function() {
        let config = ServiceConfig::default().with_request_option("VoiceId", "Joanna");
        let defaults = config.request_options.clone();
        let synth = Synthesizer::new(config, Arc::new(Counting::default())).unwrap();
        let request = SynthesisRequest::new("Hello").with_option("SampleRate", "8000");
        assert_eq!(
            synth.prepare(&request).unwrap(),
            prepare_request(&request, &defaults).unwrap()
        );
    }

    #[test]
    fn prepare_request_rejects_bad_markup() {
        let err = prepare_request(&SynthesisRequest::new("<speak>hi"), &RequestOptions::new())
            .unwrap_err();
        assert_eq!(err.excerpt, "<speak>hi");
    }

    #[test]
    fn cache_disabled_has_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::default();
        let store = murmur_cache::BinCacheStore::open(dir.path(), "bin").unwrap();
        let synth = Synthesizer::with_store(config, Arc::new(Counting::default()), Box::new(store));
        assert!(synth.cache().is_none());
    }

    #[test]
    fn new_opens_directory_store_under_cache_path() {
        let root = tempfile::tempdir().unwrap();
        let config =
            ServiceConfig::new("tts.test").with_cache(Some(root.path().to_path_buf()));
        let synth = Synthesizer::new(config, Arc::new(Counting::default())).unwrap();
        let location = synth.cache().unwrap().location();
        assert!(location.starts_with(root.path()));
        assert!(location
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("tts.test"));
    }
}
