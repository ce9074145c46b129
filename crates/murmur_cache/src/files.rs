//! Entry file operations shared by the cache store implementations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use murmur_common::{CacheEntry, Fingerprint};
use tracing::{debug, warn};

use crate::codec::{decode_entry, encode_entry};
use crate::error::CacheError;

pub(crate) fn entry_path(dir: &Path, key: &Fingerprint) -> PathBuf {
    dir.join(key.to_string())
}

pub(crate) fn exists(dir: &Path, key: &Fingerprint) -> Result<bool, CacheError> {
    let path = entry_path(dir, key);
    path.try_exists().map_err(|e| CacheError::io(path, e))
}

pub(crate) fn lookup(dir: &Path, key: &Fingerprint) -> Result<Option<CacheEntry>, CacheError> {
    let path = entry_path(dir, key);
    let raw = match std::fs::read(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(key = %key, "cache miss");
            return Ok(None);
        }
        Err(e) => return Err(CacheError::io(path, e)),
    };

    let entry = decode_entry(&path, &raw).inspect_err(|e| {
        warn!(key = %key, error = %e, "unreadable cache entry");
    })?;
    if entry.request_id != *key {
        warn!(key = %key, stored = %entry.request_id, "cache entry key mismatch");
        return Err(CacheError::Corrupt {
            path,
            reason: format!("entry belongs to request {}", entry.request_id),
        });
    }
    debug!(key = %key, bytes = entry.data.len(), "cache hit");
    Ok(Some(entry))
}

pub(crate) fn store(dir: &Path, key: &Fingerprint, entry: &CacheEntry) -> Result<(), CacheError> {
    let path = entry_path(dir, key);
    let output = encode_entry(entry)?;
    std::fs::write(&path, &output).map_err(|e| CacheError::io(&path, e))?;
    debug!(key = %key, bytes = output.len(), "stored cache entry");
    Ok(())
}

pub(crate) fn remove(dir: &Path, key: &Fingerprint) -> Result<bool, CacheError> {
    let path = entry_path(dir, key);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

/// Lists the keys of all entry files in `dir`, sorted.
///
/// Files whose names are not fingerprints are ignored.
pub(crate) fn keys(dir: &Path) -> Result<Vec<Fingerprint>, CacheError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CacheError::io(dir, e))?;

    let mut keys = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CacheError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(key) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.parse::<Fingerprint>().ok())
        {
            keys.push(key);
        }
    }
    keys.sort();
    Ok(keys)
}
