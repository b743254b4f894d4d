//! Error types for the task board

use focusflow_store::StoreError;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Task title is empty or whitespace
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Persistence backend failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(Box<figment::Error>),
}

impl BoardError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for input the caller should fix rather than retry
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::EmptyTitle | Self::InvalidValue { .. })
    }
}

impl From<figment::Error> for BoardError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(BoardError::EmptyTitle.to_string(), "task title cannot be empty");
        let err = BoardError::invalid_value("status", "'done' is not a column");
        assert_eq!(
            err.to_string(),
            "invalid value for status: 'done' is not a column"
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(BoardError::EmptyTitle.is_invalid_input());
        let store = BoardError::from(StoreError::NotAnObject { what: "patch" });
        assert!(!store.is_invalid_input());
    }
}
