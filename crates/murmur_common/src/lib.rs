//! Shared foundational types used across the Murmur speech-synthesis workspace.
//!
//! This crate provides the request fingerprint, scalar option values and the
//! canonical option set sent to a speech backend, and the cached synthesis
//! result shared by the cache and synthesis crates.

#![warn(missing_docs)]

pub mod entry;
pub mod fingerprint;
pub mod options;

pub use entry::CacheEntry;
pub use fingerprint::{Fingerprint, ParseFingerprintError};
pub use options::{CanonicalOptions, OptionValue, RequestOptions};
