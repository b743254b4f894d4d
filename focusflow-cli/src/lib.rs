//! FocusFlow command-line interface.
//!
//! A terminal front end for the `focusflow-board` engine: list, add, edit,
//! move, drag and delete tasks, and manage the pomodoro and theme settings.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error
//! - 2: Input refused (empty title, bad date, nothing to update)

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, SettingsCommand, TaskCommand};
pub use commands::{execute, run};
pub use error::{CliError, EXIT_BLOCKED, EXIT_ERROR, EXIT_SUCCESS};
