//! Key-value storage backends
//!
//! The entity store never touches a concrete storage API. It talks to a
//! [`KvStorage`] slot map instead, which lets the same store run against:
//!
//! - [`MemoryStorage`]: a `HashMap`, used in tests and for throwaway sessions
//! - [`FileStorage`]: one `<key>.json` file per slot under a data directory
//! - the browser's `localStorage` (implemented in the `becas-ui` crate)

use crate::storage::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Synchronous string-keyed storage slots
///
/// Values are opaque strings; the entity store decides their encoding.
pub trait KvStorage {
    /// Read the slot for `key`, or `None` if it was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the slot for `key`
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Clear the slot for `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: KvStorage + ?Sized> KvStorage for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-memory storage slots
///
/// An optional byte quota mimics the browser's storage limit so that
/// quota faults can be exercised without a browser.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that rejects writes once the total stored size
    /// (keys + values, in bytes) would exceed `quota`
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total bytes held, counting keys and values
    pub fn used_bytes(&self) -> usize {
        self.slots.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KvStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let replaced = self.slots.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let projected = self.used_bytes() - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StorageError::Quota {
                    key: key.to_string(),
                });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// File-backed storage slots: `<data_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory
    pub fn open(data_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        tracing::debug!("Opened file storage at {:?}", data_dir);
        Ok(Self { data_dir })
    }

    /// Root directory holding the slot files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`
    pub fn slot_path(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

impl KvStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        // Write-then-rename so a crash never leaves a half-written slot
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_get_set_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("calls").unwrap(), None);

        storage.set("calls", "[]").unwrap();
        assert_eq!(storage.get("calls").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.len(), 1);

        storage.remove("calls").unwrap();
        storage.remove("calls").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_quota() {
        let mut storage = MemoryStorage::with_quota(16);
        storage.set("users", "[1,2,3]").unwrap();

        let err = storage.set("calls", "[1,2,3,4,5,6]").unwrap_err();
        assert!(matches!(err, StorageError::Quota { ref key } if key == "calls"));
        assert_eq!(storage.get("calls").unwrap(), None);

        // Replacing a slot only counts the difference
        storage.set("users", "[9]").unwrap();
    }

    #[test]
    fn test_file_storage_persists_across_handles() {
        let dir = tempdir().unwrap();

        {
            let mut storage = FileStorage::open(dir.path()).unwrap();
            storage.set("applications", r#"[{"id":1}]"#).unwrap();
        }

        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(
            storage.get("applications").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert!(dir.path().join("applications.json").exists());
        assert_eq!(storage.get("users").unwrap(), None);
    }

    #[test]
    fn test_file_storage_remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.remove("currentUser").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(
            storage.get("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
    }
}
