//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// A missing entry is not an error; lookups return `Ok(None)`. Everything
/// else that prevents an entry from being read back exactly as it was stored
/// is surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A cache entry exists but could not be decoded or failed validation.
    #[error("corrupt cache entry {path}: {reason}")]
    Corrupt {
        /// The entry file path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// An entry could not be serialized for writing.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error reports a corrupt entry.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CacheError::Corrupt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::io(
            "/tmp/tts.amazonAb12Cd/0123",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("tts.amazonAb12Cd"));
        assert!(!err.is_corrupt());
    }

    #[test]
    fn corrupt_display() {
        let err = CacheError::Corrupt {
            path: PathBuf::from("entry"),
            reason: "checksum mismatch".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("corrupt cache entry"));
        assert!(msg.contains("checksum mismatch"));
        assert!(err.is_corrupt());
    }

    #[test]
    fn serialization_error_display() {
        let err = CacheError::Serialization {
            reason: "invalid bincode data".to_string(),
        };
        assert!(err.to_string().contains("invalid bincode data"));
    }
}
