//! Value store handlers
//!
//! Implementations of [`ValueStoreEffects`] delegating to process memory or
//! to the local filesystem.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use tzclock_core::{ValueStoreEffects, ValueStoreError};

/// In-memory value store handler
///
/// Holds records for the lifetime of the process. This is the degraded
/// mode the preference layer falls back to when the host provides no
/// durable store: everything still works, nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryValueStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record, modeling the user clearing site storage while
    /// the cookie jar stays untouched
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ValueStoreEffects for MemoryValueStore {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), ValueStoreError> {
        if key.is_empty() {
            return Err(ValueStoreError::InvalidKey {
                reason: "key cannot be empty".to_string(),
            });
        }
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, ValueStoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool, ValueStoreError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, ValueStoreError> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| prefix.map_or(true, |p| k.starts_with(p)))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// Filesystem-backed value store handler
///
/// Stores each record as `<key>.json` under a base directory. Preference
/// keys are flat identifiers, so keys containing path separators are
/// rejected rather than mapped onto subdirectories.
#[derive(Debug, Clone)]
pub struct FilesystemValueStore {
    base_path: PathBuf,
}

impl FilesystemValueStore {
    /// Create a handler rooted at the given directory
    ///
    /// The directory is created lazily on first write; a missing directory
    /// reads as an empty store.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// The directory records are stored under
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, ValueStoreError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> Result<(), ValueStoreError> {
    if key.is_empty() {
        return Err(ValueStoreError::InvalidKey {
            reason: "key cannot be empty".to_string(),
        });
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(ValueStoreError::InvalidKey {
            reason: format!("key {key:?} must not address the filesystem"),
        });
    }
    Ok(())
}

#[async_trait]
impl ValueStoreEffects for FilesystemValueStore {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), ValueStoreError> {
        let path = self.record_path(key)?;
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ValueStoreError::WriteFailed(format!("create base directory: {e}")))?;
        fs::write(&path, value)
            .await
            .map_err(|e| ValueStoreError::WriteFailed(format!("write {}: {e}", path.display())))
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, ValueStoreError> {
        let path = self.record_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ValueStoreError::ReadFailed(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, ValueStoreError> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ValueStoreError::DeleteFailed(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, ValueStoreError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ValueStoreError::ReadFailed(format!(
                    "read directory {}: {e}",
                    self.base_path.display()
                )))
            }
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ValueStoreError::ReadFailed(format!("read directory entry: {e}")))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(key) = name.strip_suffix(".json") else {
                continue;
            };
            if prefix.map_or(true, |p| key.starts_with(p)) {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryValueStore::new();
        store.store("clock-face", b"\"luxury\"".to_vec()).await.unwrap();

        let bytes = store.retrieve("clock-face").await.unwrap();
        assert_eq!(bytes.as_deref(), Some(b"\"luxury\"".as_slice()));

        assert!(store.remove("clock-face").await.unwrap());
        assert!(!store.remove("clock-face").await.unwrap());
        assert_eq!(store.retrieve("clock-face").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_rejects_empty_key() {
        let store = MemoryValueStore::new();
        let err = store.store("", Vec::new()).await.unwrap_err();
        assert!(matches!(err, ValueStoreError::InvalidKey { .. }));
    }

    #[tokio::test]
    async fn memory_store_lists_keys_by_prefix() {
        let store = MemoryValueStore::new();
        store.store("user-timezone", b"1".to_vec()).await.unwrap();
        store.store("target-timezone", b"2".to_vec()).await.unwrap();
        store.store("clock-face", b"3".to_vec()).await.unwrap();

        let all = store.list_keys(None).await.unwrap();
        assert_eq!(all, vec!["clock-face", "target-timezone", "user-timezone"]);

        let filtered = store.list_keys(Some("user-")).await.unwrap();
        assert_eq!(filtered, vec!["user-timezone"]);
    }

    #[tokio::test]
    async fn memory_store_clear_drops_everything() {
        let store = MemoryValueStore::new();
        store.store("clock-face", b"3".to_vec()).await.unwrap();
        store.clear().await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn filesystem_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemValueStore::new(dir.path());

        store.store("clock-face", b"\"luxury\"".to_vec()).await.unwrap();
        let bytes = store.retrieve("clock-face").await.unwrap();
        assert_eq!(bytes.as_deref(), Some(b"\"luxury\"".as_slice()));

        assert!(store.remove("clock-face").await.unwrap());
        assert_eq!(store.retrieve("clock-face").await.unwrap(), None);
    }

    #[tokio::test]
    async fn filesystem_store_missing_directory_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemValueStore::new(dir.path().join("never-created"));

        assert_eq!(store.retrieve("clock-face").await.unwrap(), None);
        assert!(store.list_keys(None).await.unwrap().is_empty());
        assert!(!store.remove("clock-face").await.unwrap());
    }

    #[tokio::test]
    async fn filesystem_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemValueStore::new(dir.path());

        for key in ["../escape", "a/b", "", ".."] {
            let err = store.store(key, Vec::new()).await.unwrap_err();
            assert!(matches!(err, ValueStoreError::InvalidKey { .. }), "{key:?}");
        }
    }

    #[tokio::test]
    async fn filesystem_store_lists_only_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemValueStore::new(dir.path());

        store.store("user-timezone", b"1".to_vec()).await.unwrap();
        store.store("clock-face", b"2".to_vec()).await.unwrap();
        std::fs::write(dir.path().join("stray.txt"), b"ignored").unwrap();

        let keys = store.list_keys(None).await.unwrap();
        assert_eq!(keys, vec!["clock-face", "user-timezone"]);
    }
}
