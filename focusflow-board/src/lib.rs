//! Task board engine for FocusFlow
//!
//! Tasks live in three fixed columns (To Do, In Progress, Completed). The
//! [`TaskStore`] holds the in-memory collection and notifies subscribers on
//! every change; the [`TaskService`] applies operations to it and to a
//! persistence adapter from `focusflow-store`; the [`dnd`] module turns drag
//! gestures into those operations.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use focusflow_board::{BoardConfig, NewTask, TaskService, TaskStatus, TaskStore};
//!
//! # async fn example() -> focusflow_board::Result<()> {
//! let config = BoardConfig::load()?;
//! let service = TaskService::new(config.open_adapter()?, TaskStore::new());
//! service.load_tasks().await?;
//!
//! let task = service.add_task(NewTask::new("Write the report")).await?;
//! service.update_task_status(&task.id, TaskStatus::InProgress).await?;
//!
//! for column in service.store().board().columns {
//!     println!("{}: {}", column.title(), column.tasks.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dnd;
mod error;
mod samples;
mod service;
pub mod settings;
mod state;
pub mod types;

pub use config::{BoardConfig, ConfigOverrides, StorageBackend, StorageConfig};
pub use dnd::{DragController, DragEnd, DragOutcome, DragTarget, DropTarget};
pub use error::{BoardError, Result};
pub use samples::sample_tasks;
pub use service::TaskService;
pub use settings::SettingsStore;
pub use state::{BoardView, ColumnView, StoreEvent, TaskStore};
pub use types::{
    AppSettings, NewTask, Subtask, SubtaskId, Task, TaskId, TaskPatch, TaskStatus, Timestamp,
};
