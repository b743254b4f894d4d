//! Record persistence for the FocusFlow board
//!
//! Every record type carries a unique string id and is persisted through the
//! [`StorageAdapter`] contract. Three interchangeable backends implement it:
//!
//! - [`MemoryAdapter`] - process-local map, nothing touches disk
//! - [`KeyValueAdapter`] - the whole collection as one JSON value under one key
//!   of a [`KeyValueStore`]; every write rewrites the collection
//! - [`DatabaseAdapter`] - one SQLite row per record, keyed by id, with the
//!   connection and schema created on first use
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use focusflow_store::{KeyValueAdapter, KeyValueStore, Record, StorageAdapter};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Note {
//!     id: String,
//!     body: String,
//! }
//!
//! #[derive(Default, Serialize)]
//! struct NotePatch {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     body: Option<String>,
//! }
//!
//! impl Record for Note {
//!     type Patch = NotePatch;
//!     fn id(&self) -> &str {
//!         &self.id
//!     }
//! }
//!
//! # async fn example() -> focusflow_store::Result<()> {
//! let notes = KeyValueAdapter::<Note>::new(KeyValueStore::new("/tmp/notes"), "notes")?;
//! notes.create(&Note { id: "1".into(), body: "hello".into() }).await?;
//! notes.update("1", &NotePatch { body: Some("bye".into()) }).await?;
//! assert_eq!(notes.get_all().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

mod adapter;
mod database;
mod error;
mod key_value;
mod memory;
mod record;

pub use adapter::StorageAdapter;
pub use database::{DatabaseAdapter, DatabaseLocation, SCHEMA_VERSION};
pub use error::{Result, StoreError};
pub use key_value::{KeyValueAdapter, KeyValueStore};
pub use memory::MemoryAdapter;
pub use record::{merge_patch, Record};

// Re-export for adapter implementations outside this crate
pub use async_trait::async_trait;
