//! The synthesized result stored in the cache and returned to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fingerprint::Fingerprint;

/// A synthesized audio clip together with the request that produced it.
///
/// `request_id` is the fingerprint of the canonical options, `data` holds the
/// raw audio bytes exactly as returned by the backend, and `mime` is the
/// backend's declared content type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fingerprint of the request that produced this audio.
    pub request_id: Fingerprint,
    /// Raw audio bytes.
    pub data: Vec<u8>,
    /// Content type of `data` (e.g. `audio/ogg`).
    pub mime: String,
}

impl CacheEntry {
    /// Creates a new entry.
    pub fn new(request_id: Fingerprint, data: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            request_id,
            data,
            mime: mime.into(),
        }
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("request_id", &self.request_id)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("mime", &self.mime)
            .finish()
    }
}
