//! CLI error type and exit code mapping

use focusflow_board::BoardError;
use thiserror::Error;

/// Command completed
pub const EXIT_SUCCESS: i32 = 0;
/// Command failed
pub const EXIT_ERROR: i32 = 1;
/// Input was refused before anything was changed
pub const EXIT_BLOCKED: i32 = 2;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    #[error("id prefix '{prefix}' matches {count} tasks, use more characters")]
    AmbiguousId { prefix: String, count: usize },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("nothing to update, pass at least one field")]
    NothingToUpdate,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Board(e) if e.is_invalid_input() => EXIT_BLOCKED,
            Self::InvalidDate { .. } | Self::NothingToUpdate => EXIT_BLOCKED,
            _ => EXIT_ERROR,
        }
    }
}
