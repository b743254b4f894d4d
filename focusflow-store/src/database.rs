//! SQLite-backed persistence, one row per record
//!
//! # Schema
//!
//! Each store name maps to one table:
//!
//! ```sql
//! CREATE TABLE <store> (id TEXT PRIMARY KEY, data TEXT NOT NULL);
//! ```
//!
//! `data` holds the record serialized as JSON. The schema version lives in
//! `PRAGMA user_version` and is fixed at [`SCHEMA_VERSION`].
//!
//! The database file is not opened until the first operation. That first call
//! opens the connection, creates the table if needed and stamps the version.

use crate::adapter::StorageAdapter;
use crate::error::{Result, StoreError};
use crate::record::{merge_patch, Record};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::debug;

/// Schema version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A database file, created with its parent directory if missing
    File(PathBuf),
    /// A private in-memory database, gone when the adapter is dropped
    InMemory,
}

/// Record store backed by one SQLite table
pub struct DatabaseAdapter<T> {
    location: DatabaseLocation,
    store_name: String,
    conn: OnceCell<Mutex<Connection>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> DatabaseAdapter<T> {
    /// Adapter over the database file at `path`, using table `store_name`
    pub fn open(path: impl Into<PathBuf>, store_name: impl Into<String>) -> Result<Self> {
        Self::with_location(DatabaseLocation::File(path.into()), store_name)
    }

    /// Adapter over a private in-memory database
    pub fn in_memory(store_name: impl Into<String>) -> Result<Self> {
        Self::with_location(DatabaseLocation::InMemory, store_name)
    }

    fn with_location(location: DatabaseLocation, store_name: impl Into<String>) -> Result<Self> {
        let store_name = store_name.into();
        validate_store_name(&store_name)?;
        Ok(Self {
            location,
            store_name,
            conn: OnceCell::new(),
            _marker: PhantomData,
        })
    }

    /// Table name
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Database location
    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// True once the first operation has opened the connection
    pub fn is_connected(&self) -> bool {
        self.conn.initialized()
    }

    async fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        let conn = self
            .conn
            .get_or_try_init(|| async { self.connect().map(Mutex::new) })
            .await?;
        Ok(conn.lock().await)
    }

    fn connect(&self) -> Result<Connection> {
        let conn = match &self.location {
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                debug!(path = %path.display(), store = %self.store_name, "opening database");
                Connection::open(path)?
            }
            DatabaseLocation::InMemory => Connection::open_in_memory()?,
        };
        upgrade_schema(&conn, &self.store_name)?;
        Ok(conn)
    }
}

fn validate_store_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidStoreName {
            name: name.to_string(),
        })
    }
}

/// Bring a freshly opened connection up to [`SCHEMA_VERSION`]
fn upgrade_schema(conn: &Connection, store_name: &str) -> Result<()> {
    let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {store_name} (
            id TEXT PRIMARY KEY,
            data TEXT NOT NULL
        );"
    ))?;

    if found < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    Ok(())
}

#[async_trait]
impl<T: Record> StorageAdapter<T> for DatabaseAdapter<T> {
    async fn get_all(&self) -> Result<Vec<T>> {
        let conn = self.connection().await?;
        let mut stmt = conn.prepare(&format!(
            "SELECT data FROM {} ORDER BY rowid",
            self.store_name
        ))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        let conn = self.connection().await?;
        let data: Option<String> = conn
            .query_row(
                &format!("SELECT data FROM {} WHERE id = ?1", self.store_name),
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, record: &T) -> Result<()> {
        let data = serde_json::to_string(record)?;
        let conn = self.connection().await?;
        conn.execute(
            &format!(
                "INSERT INTO {} (id, data) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET data = excluded.data",
                self.store_name
            ),
            params![record.id(), data],
        )?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> Result<()> {
        let mut conn = self.connection().await?;
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
            .query_row(
                &format!("SELECT data FROM {} WHERE id = ?1", self.store_name),
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(existing) = existing else {
            return Ok(());
        };

        let record: T = serde_json::from_str(&existing)?;
        let merged = serde_json::to_string(&merge_patch(&record, patch)?)?;
        tx.execute(
            &format!("UPDATE {} SET data = ?2 WHERE id = ?1", self.store_name),
            params![id, merged],
        )?;
        tx.commit()?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.connection().await?;
        conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", self.store_name),
            params![id],
        )?;
        Ok(())
    }
}
