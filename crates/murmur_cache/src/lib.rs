//! Filesystem-backed storage for synthesized speech.
//!
//! Entries are keyed by request [`Fingerprint`](murmur_common::Fingerprint)
//! and stored one file per key inside a cache directory owned by the store.
//! Two strategies implement the same [`CacheStore`] contract:
//!
//! - [`DirCacheStore`] discovers (or creates) a uniquely named directory whose
//!   name starts with the service's plugin identifier.
//! - [`BinCacheStore`] uses a fixed, named bin directory under the root.
//!
//! A corrupt entry is reported as
//! [`CacheError::Corrupt`] rather than being treated as a miss.

#![warn(missing_docs)]

pub mod codec;
pub mod dir;
pub mod error;
mod files;
pub mod namespace;
pub mod store;

pub use dir::{resolve_directory, resolve_root, DirCacheStore};
pub use error::CacheError;
pub use namespace::BinCacheStore;
pub use store::CacheStore;
