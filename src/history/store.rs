// =============================================================================
// Keyed Store Backends — String values by key, pluggable persistence
// =============================================================================
//
// The history layer persists through this minimal abstraction so that the
// snapshot and setup stores never care where bytes live. Two backends:
//
//   - MemoryStore   — plain in-process map; tests and ephemeral embedding.
//   - JsonFileStore — one file per key under a root directory, written with
//     an atomic tmp + rename so a crash mid-write cannot corrupt a key.
//
// Backends report failures as `anyhow::Result`; the stores above translate
// those into degrade-and-continue behavior (empty reads, no-op writes).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::debug;

/// Minimal keyed persistence: read and overwrite whole string values.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process backend backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// File-per-key backend rooted at a directory. Writes are atomic
/// (tmp + rename) to prevent corruption if the process dies mid-write.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a backend rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read store key from {}", path.display()))
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create store root {}", self.root.display()))?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, value)
            .with_context(|| format!("failed to write tmp store file {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("failed to rename tmp store file to {}", path.display()))?;

        debug!(key, path = %path.display(), "store key written (atomic)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sprint-pulse-{tag}-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.read("missing").unwrap(), None);
        store.write("k", "v1").unwrap();
        store.write("k", "v2").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn file_store_roundtrip_and_overwrite() {
        let dir = scratch_dir("roundtrip");
        let store = JsonFileStore::new(&dir);

        assert_eq!(store.read("setup").unwrap(), None);
        store.write("setup", "{\"a\":1}").unwrap();
        assert_eq!(store.read("setup").unwrap().as_deref(), Some("{\"a\":1}"));
        store.write("setup", "{\"a\":2}").unwrap();
        assert_eq!(store.read("setup").unwrap().as_deref(), Some("{\"a\":2}"));

        // No stray tmp file left behind.
        assert!(!dir.join("setup.json.tmp").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_store_keys_are_independent() {
        let dir = scratch_dir("keys");
        let store = JsonFileStore::new(&dir);
        store.write("a", "1").unwrap();
        store.write("b", "2").unwrap();
        assert_eq!(store.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.read("b").unwrap().as_deref(), Some("2"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
