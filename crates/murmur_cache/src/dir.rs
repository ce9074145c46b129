//! Directory-scan cache store.
//!
//! The cache directory lives directly under a root (the configured cache path
//! or the system temporary directory) and is named `<plugin_id><suffix>`,
//! where the suffix is random. On open, the root is scanned for an existing
//! directory with the plugin id as name prefix; only if none is found is a new
//! one created.
//!
//! There is no portable primitive that creates a uniquely named directory and
//! reports the name, so creation borrows the exclusive-create guarantee of
//! temporary files: a placeholder file is created with `O_EXCL` semantics,
//! deleted, and a directory with the same name is created in its place. After
//! creating, the root is scanned again so that processes racing to initialize
//! the same root converge on the same (lexicographically first) directory, and
//! a directory that lost the race is removed by the process that created it.
//! Threads of one process never race: creation is serialized by a lock.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use murmur_common::{CacheEntry, Fingerprint};
use tracing::{debug, info};

use crate::error::CacheError;
use crate::files;
use crate::store::CacheStore;

/// Attempts at creating the directory before giving up on name collisions.
const CREATE_ATTEMPTS: usize = 8;

/// Returns the configured cache root, or the system temporary directory.
pub fn resolve_root(configured: Option<&Path>) -> PathBuf {
    match configured {
        Some(path) => path.to_path_buf(),
        None => std::env::temp_dir(),
    }
}

/// Serializes directory creation between threads of this process.
static CREATE_LOCK: Mutex<()> = Mutex::new(());

/// Finds the cache directory for `plugin_id` under `root`, creating it if it
/// does not exist yet.
pub fn resolve_directory(root: &Path, plugin_id: &str) -> Result<PathBuf, CacheError> {
    std::fs::create_dir_all(root).map_err(|e| CacheError::io(root, e))?;

    if let Some(dir) = find_directory(root, plugin_id)? {
        debug!(dir = %dir.display(), "reusing cache directory");
        return Ok(dir);
    }

    let _guard = CREATE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(dir) = find_directory(root, plugin_id)? {
        debug!(dir = %dir.display(), "reusing cache directory");
        return Ok(dir);
    }

    for _ in 0..CREATE_ATTEMPTS {
        if let Some(created) = create_directory(root, plugin_id)? {
            if let Some(dir) = settle(root, plugin_id, &created)? {
                info!(dir = %dir.display(), "created cache directory");
                return Ok(dir);
            }
        }
    }

    Err(CacheError::io(
        root,
        std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("could not create a unique cache directory for '{plugin_id}'"),
        ),
    ))
}

/// Rescans `root` after `created` was made and picks the directory every
/// racing process settles on: the first in name order.
///
/// If another process created a directory that sorts first, `created` is
/// removed again. Removal failures are ignored: the directory may already be
/// gone or hold entries written by a process that picked it earlier.
fn settle(root: &Path, plugin_id: &str, created: &Path) -> Result<Option<PathBuf>, CacheError> {
    let chosen = find_directory(root, plugin_id)?;
    if let Some(dir) = &chosen {
        if dir != created {
            debug!(
                created = %created.display(),
                chosen = %dir.display(),
                "discarding duplicate cache directory"
            );
            let _ = std::fs::remove_dir(created);
        }
    }
    Ok(chosen)
}

/// Scans the immediate children of `root` for directories whose name starts
/// with `plugin_id`, returning the first one in name order.
fn find_directory(root: &Path, plugin_id: &str) -> Result<Option<PathBuf>, CacheError> {
    let entries = std::fs::read_dir(root).map_err(|e| CacheError::io(root, e))?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CacheError::io(root, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(plugin_id) && entry.path().is_dir() {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

/// Creates a new uniquely named directory under `root`.
///
/// Returns `Ok(None)` if the name was taken between deleting the placeholder
/// and creating the directory.
fn create_directory(root: &Path, plugin_id: &str) -> Result<Option<PathBuf>, CacheError> {
    let placeholder = tempfile::Builder::new()
        .prefix(plugin_id)
        .tempfile_in(root)
        .map_err(|e| CacheError::io(root, e))?;
    let path = placeholder.path().to_path_buf();
    placeholder.close().map_err(|e| CacheError::io(&path, e))?;

    match std::fs::create_dir(&path) {
        Ok(()) => Ok(Some(path)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

/// Cache store backed by a discovered `<root>/<plugin_id><suffix>` directory.
#[derive(Debug, Clone)]
pub struct DirCacheStore {
    dir: PathBuf,
}

impl DirCacheStore {
    /// Opens the store for `plugin_id` under `root`, discovering or creating
    /// its directory.
    pub fn open(root: &Path, plugin_id: &str) -> Result<Self, CacheError> {
        let dir = resolve_directory(root, plugin_id)?;
        Ok(Self { dir })
    }

    /// Returns the file path an entry for `key` is stored at.
    pub fn entry_path(&self, key: &Fingerprint) -> PathBuf {
        files::entry_path(&self.dir, key)
    }
}

impl CacheStore for DirCacheStore {
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
