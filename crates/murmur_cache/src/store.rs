//! The storage contract shared by all cache strategies.

use std::path::Path;

use murmur_common::{CacheEntry, Fingerprint};

use crate::error::CacheError;

/// Durable, keyed storage of synthesized entries for one service.
///
/// Implementations own their directory and every entry file beneath it;
/// callers only ever go through this trait.
pub trait CacheStore: Send + Sync {
    /// Returns the directory holding this store's entries.
    fn location(&self) -> &Path;

    /// Returns `true` if an entry is stored under `key`.
    fn exists(&self, key: &Fingerprint) -> Result<bool, CacheError>;

    /// Reads the entry stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored. An entry that exists but
    /// cannot be decoded is an error, never a miss.
    fn lookup(&self, key: &Fingerprint) -> Result<Option<CacheEntry>, CacheError>;

    /// Writes `entry` under `key`, replacing any previous entry.
    fn store(&self, key: &Fingerprint, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Deletes the entry under `key`. Returns `false` if there was none.
    fn remove(&self, key: &Fingerprint) -> Result<bool, CacheError>;

    /// Lists all stored keys in ascending order.
    fn keys(&self) -> Result<Vec<Fingerprint>, CacheError>;

    /// Deletes every stored entry and returns how many were removed.
    fn purge(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for key in self.keys()? {
            if self.remove(&key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
