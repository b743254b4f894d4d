//! Error types for record persistence

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by a persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Key cannot be mapped onto the key-value directory
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Store name is not usable as a table identifier
    #[error("invalid store name '{name}': only ASCII letters, digits and '_' are allowed")]
    InvalidStoreName { name: String },

    /// Database was written by a newer schema
    #[error("database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i64, supported: i64 },

    /// Record or patch did not serialize to a JSON object
    #[error("cannot merge {what}: expected a JSON object")]
    NotAnObject { what: &'static str },
}

impl StoreError {
    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
