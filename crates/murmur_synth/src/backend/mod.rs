//! The speech backend contract.

pub mod command;

use std::fmt;

use murmur_common::CanonicalOptions;

/// Audio returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// Raw audio bytes.
    pub audio: Vec<u8>,
    /// Declared content type of `audio`.
    pub content_type: String,
}

/// Category of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Credentials were missing or refused.
    Auth,
    /// A rate limit or quota was exceeded.
    Quota,
    /// The backend rejected one of the request parameters.
    InvalidParameter,
    /// The backend could not be reached or the exchange broke off.
    Transport,
    /// Any other refusal reported by the backend.
    Rejected,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendErrorKind::Auth => "auth",
            BackendErrorKind::Quota => "quota",
            BackendErrorKind::InvalidParameter => "invalid parameter",
            BackendErrorKind::Transport => "transport",
            BackendErrorKind::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A synthesis call failed at the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("speech backend error ({kind}): {message}")]
pub struct BackendError {
    /// What kind of failure this is.
    pub kind: BackendErrorKind,
    /// The backend's own message.
    pub message: String,
}

impl BackendError {
    /// Creates a new backend error.
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a [`BackendErrorKind::Transport`] error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Transport, message)
    }
}

/// An external speech synthesis service.
///
/// The connection is built once per service and injected into the
/// [`SynthesisGateway`](crate::SynthesisGateway). Implementations must turn
/// every failure into a [`BackendError`].
pub trait SpeechBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Synthesizes `text` with the given fully merged parameters.
    ///
    /// `options` already contains the text under [`TEXT_KEY`](crate::TEXT_KEY).
    fn synthesize(
        &self,
        text: &str,
        options: &CanonicalOptions,
    ) -> Result<SynthesizedAudio, BackendError>;
}
