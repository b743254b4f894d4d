//! In-process adapter backed by an insertion-ordered map

use crate::adapter::StorageAdapter;
use crate::error::Result;
use crate::record::{merge_patch, Record};
use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

/// Keeps records in memory for the lifetime of the adapter.
///
/// `get_all` returns records in first-insertion order; an upsert of an existing
/// id keeps its slot.
pub struct MemoryAdapter<T> {
    records: RwLock<IndexMap<String, T>>,
}

impl<T: Record> MemoryAdapter<T> {
    /// Create an empty adapter
    pub fn new() -> Self {
        Self {
            records: RwLock::new(IndexMap::new()),
        }
    }

    /// Create an adapter pre-populated with `records`
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id().to_string(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True when nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T: Record> Default for MemoryAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> StorageAdapter<T> for MemoryAdapter<T> {
    async fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn create(&self, record: &T) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.id().to_string(), record.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> Result<()> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.get_mut(id) {
            *existing = merge_patch(existing, patch)?;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.records.write().await.shift_remove(id);
        Ok(())
    }
}
