//! Errors surfaced by the synthesize-with-cache path.

use murmur_cache::CacheError;
use murmur_config::ConfigError;

use crate::backend::BackendError;
use crate::validate::ValidationError;

/// Any failure of a synthesis call.
///
/// Nothing is retried internally; each variant reaches the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The text is not well-formed speech markup.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cache could not be opened, read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The speech backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The service or backend configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
