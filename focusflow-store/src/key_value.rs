//! Key-value persistence: one JSON file per key
//!
//! [`KeyValueStore`] is a small local stand-in for a browser's key-value
//! storage: a directory where `get_item`/`set_item` read and write whole
//! values. [`KeyValueAdapter`] keeps an entire record collection as a single
//! JSON array under one key, so each `create`, `update` or `delete` reads the
//! array, edits it and writes all of it back.

use crate::adapter::StorageAdapter;
use crate::error::{Result, StoreError};
use crate::record::{merge_patch, Record};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::trace;

/// Directory of JSON values addressed by key
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    root: PathBuf,
}

impl KeyValueStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file holding `key`
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Raw value stored under `key`
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the value stored under `key` (atomic write via temp file)
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        trace!(key, bytes = value.len(), "writing key");
        atomic_write(&path, value.as_bytes()).await
    }

    /// Remove `key`; missing keys are ignored
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Deserialize the value under `key`
    pub async fn get_json<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        match self.get_item(key).await? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` under `key`
    pub async fn set_json<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> Result<()> {
        let content = serde_json::to_string(value)?;
        self.set_item(key, &content).await
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::invalid_key(key, "key is empty"));
    }
    if key.starts_with('.') {
        return Err(StoreError::invalid_key(key, "key must not start with '.'"));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(StoreError::invalid_key(
            key,
            format!("character {bad:?} is not allowed"),
        ));
    }
    Ok(())
}

/// Write `content` to `path` through a sibling temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

/// A record collection stored as one JSON array under one key
pub struct KeyValueAdapter<T> {
    store: KeyValueStore,
    key: String,
    // Serializes read-modify-write cycles issued through this instance
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> KeyValueAdapter<T> {
    /// Create an adapter for the collection stored under `key`
    pub fn new(store: KeyValueStore, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            store,
            key,
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    /// Key holding the collection
    pub fn key(&self) -> &str {
        &self.key
    }

    async fn read_all(&self) -> Result<Vec<T>> {
        Ok(self.store.get_json(&self.key).await?.unwrap_or_default())
    }

    async fn write_all(&self, records: &[T]) -> Result<()> {
        self.store.set_json(&self.key, records).await
    }
}

#[async_trait]
impl<T: Record> StorageAdapter<T> for KeyValueAdapter<T> {
    async fn get_all(&self) -> Result<Vec<T>> {
        self.read_all().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        let records = self.read_all().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn create(&self, record: &T) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records).await
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        let Some(existing) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(());
        };
        *existing = merge_patch(existing, patch)?;
        self.write_all(&records).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        records.retain(|r| r.id() != id);
        self.write_all(&records).await
    }
}
