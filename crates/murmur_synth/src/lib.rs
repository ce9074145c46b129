//! Text-to-speech synthesis with an on-disk result cache.
//!
//! A [`Synthesizer`] runs every request through the same path:
//!
//! 1. [`validate`] the text as a speech-markup fragment
//! 2. [`normalize`] per-call options over the service defaults
//! 3. fingerprint the canonical options
//! 4. look the fingerprint up in the cache (if enabled)
//! 5. on a miss, call the [`SpeechBackend`] through a [`SynthesisGateway`]
//! 6. store the result (if caching is enabled) and return it

#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod synthesizer;
pub mod validate;

pub use backend::command::CommandBackend;
pub use backend::{BackendError, BackendErrorKind, SpeechBackend, SynthesizedAudio};
pub use error::SynthesisError;
pub use gateway::SynthesisGateway;
pub use normalize::{normalize, TEXT_KEY};
pub use synthesizer::{prepare_request, SynthesisRequest, Synthesizer};
pub use validate::{validate, ValidationError};
