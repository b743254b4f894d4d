//! The persistence contract shared by every backend

use crate::error::Result;
use crate::record::Record;
use async_trait::async_trait;

/// Key-based CRUD over records of type `T`.
///
/// Lookups that miss are `Ok(None)`, updates and deletes of unknown ids are
/// no-ops. None of these calls may leave a half-written state visible to a
/// later call on the same adapter.
#[async_trait]
pub trait StorageAdapter<T: Record>: Send + Sync {
    /// Every stored record. Empty store yields an empty vec.
    async fn get_all(&self) -> Result<Vec<T>>;

    /// Record with the given id, if any
    async fn get_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Insert, or replace the record with the same id
    async fn create(&self, record: &T) -> Result<()>;

    /// Merge `patch` into the stored record; no-op when `id` is absent
    async fn update(&self, id: &str, patch: &T::Patch) -> Result<()>;

    /// Remove the record if present
    async fn delete(&self, id: &str) -> Result<()>;
}
