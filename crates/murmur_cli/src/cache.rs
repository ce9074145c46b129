//! Implementation of the `murmur cache` command.

use murmur_cache::{resolve_root, CacheError, CacheStore, DirCacheStore};
use murmur_config::ServiceConfig;

use crate::service::load_service_config;
use crate::{CacheAction, GlobalArgs};

/// Runs the `murmur cache` command.
///
/// The cache directory is resolved from the configured root and plugin id
/// whether or not caching is enabled for synthesis.
pub fn run(action: CacheAction, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_service_config(global)?;
    let store = open_store(&config)?;
    for line in execute(action, &store)? {
        println!("{line}");
    }
    Ok(0)
}

fn open_store(config: &ServiceConfig) -> Result<DirCacheStore, CacheError> {
    let root = resolve_root(config.cache_path.as_deref());
    DirCacheStore::open(&root, &config.plugin_id)
}

/// Performs `action` and returns the lines to print.
fn execute(action: CacheAction, store: &dyn CacheStore) -> Result<Vec<String>, CacheError> {
    match action {
        CacheAction::Path => Ok(vec![store.location().display().to_string()]),
        CacheAction::List => Ok(store.keys()?.iter().map(|k| k.to_string()).collect()),
        CacheAction::Purge => {
            let removed = store.purge()?;
            Ok(vec![format!("removed {removed} entries")])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_common::{CacheEntry, Fingerprint};

    fn config_at(root: &std::path::Path) -> ServiceConfig {
        ServiceConfig::new("tts.test").with_cache(Some(root.to_path_buf()))
    }

    fn seed(store: &DirCacheStore, text: &str) -> Fingerprint {
        let key = Fingerprint::of_pairs([("Text", text)]);
        store
            .store(&key, &CacheEntry::new(key, text.as_bytes().to_vec(), "audio/ogg"))
            .unwrap();
        key
    }

    #[test]
    fn path_reports_store_location() {
        let root = tempfile::tempdir().unwrap();
        let store = open_store(&config_at(root.path())).unwrap();
        let lines = execute(CacheAction::Path, &store).unwrap();
        assert_eq!(lines, vec![store.location().display().to_string()]);
        assert!(store.location().starts_with(root.path()));
    }

    #[test]
    fn list_prints_sorted_keys() {
        let root = tempfile::tempdir().unwrap();
        let store = open_store(&config_at(root.path())).unwrap();
        let mut keys = vec![seed(&store, "one"), seed(&store, "two")];
        keys.sort();
        let lines = execute(CacheAction::List, &store).unwrap();
        let expected: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(lines, expected);
    }

    #[test]
    fn purge_empties_the_store() {
        let root = tempfile::tempdir().unwrap();
        let store = open_store(&config_at(root.path())).unwrap();
        seed(&store, "one");
        seed(&store, "two");
        let lines = execute(CacheAction::Purge, &store).unwrap();
        assert_eq!(lines, vec!["removed 2 entries".to_string()]);
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn reopening_finds_the_same_directory() {
        let root = tempfile::tempdir().unwrap();
        let first = open_store(&config_at(root.path())).unwrap();
        let second = open_store(&config_at(root.path())).unwrap();
        assert_eq!(first.location(), second.location());
    }
}
