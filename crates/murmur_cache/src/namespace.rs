//! Namespaced-bin cache store.
//!
//! Stores entries under a fixed `<root>/<bin>/` directory. This is the
//! strategy of a shared cache manager that partitions one root into named
//! bins; it needs no discovery step because the bin name is stable.

use std::path::{Path, PathBuf};

use murmur_common::{CacheEntry, Fingerprint};

use crate::error::CacheError;
use crate::files;
use crate::store::CacheStore;

/// Cache store backed by a named bin directory.
#[derive(Debug, Clone)]
pub struct BinCacheStore {
    dir: PathBuf,
}

impl BinCacheStore {
    /// Opens (creating if necessary) the bin named `bin` under `root`.
    pub fn open(root: &Path, bin: &str) -> Result<Self, CacheError> {
        let dir = root.join(bin);
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::io(&dir, e))?;
        Ok(Self { dir })
    }
}

impl CacheStore for BinCacheStore {
    fn location(&self) -> &Path {
        &self.dir
    }

    fn exists(&self, key: &Fingerprint) -> Result<bool, CacheError> {
        files::exists(&self.dir, key)
    }

    fn lookup(&self, key: &Fingerprint) -> Result<Option<CacheEntry>, CacheError> {
        files::lookup(&self.dir, key)
    }

    fn store(&self, key: &Fingerprint, entry: &CacheEntry) -> Result<(), CacheError> {
        files::store(&self.dir, key, entry)
    }

    fn remove(&self, key: &Fingerprint) -> Result<bool, CacheError> {
        files::remove(&self.dir, key)
    }

    fn keys(&self) -> Result<Vec<Fingerprint>, CacheError> {
        files::keys(&self.dir)
    }
}
