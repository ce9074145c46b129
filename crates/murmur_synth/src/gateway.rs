//! Invocation of the speech backend.

use std::sync::Arc;
use std::time::Instant;

use murmur_common::{CacheEntry, CanonicalOptions, Fingerprint};
use tracing::{info, warn};

use crate::backend::{BackendError, BackendErrorKind, SpeechBackend};

/// Calls the injected backend and wraps its answer into a [`CacheEntry`].
#[derive(Clone)]
pub struct SynthesisGateway {
    backend: Arc<dyn SpeechBackend>,
}

impl SynthesisGateway {
    /// Creates a gateway over an already constructed backend connection.
    pub fn new(backend: Arc<dyn SpeechBackend>) -> Self {
        Self { backend }
    }

    /// Synthesizes `text` with the canonical options.
    ///
    /// The returned entry carries `request_id` as its identifier. An empty
    /// audio payload is treated as a backend refusal.
    pub fn invoke(
        &self,
        text: &str,
        options: &CanonicalOptions,
        request_id: &Fingerprint,
    ) -> Result<CacheEntry, BackendError> {
        let started = Instant::now();
        let audio = self
            .backend
            .synthesize(text, options)
            .inspect_err(|e| {
                warn!(backend = self.backend.name(), request_id = %request_id, error = %e, "synthesis failed");
            })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if audio.audio.is_empty() {
            return Err(BackendError::new(
                BackendErrorKind::Rejected,
                "backend returned no audio",
            ));
        }

        info!(
            backend = self.backend.name(),
            request_id = %request_id,
            bytes = audio.audio.len(),
            elapsed_ms,
            "synthesized speech"
        );
        Ok(CacheEntry::new(*request_id, audio.audio, audio.content_type))
    }
}
