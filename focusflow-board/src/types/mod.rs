//! Core types for the task board

mod ids;
mod settings;
mod task;
mod timestamp;

pub use ids::{SubtaskId, TaskId};
pub use settings::{AppSettings, PomodoroSettings, ThemeMode, ThemeSettings};
pub use task::{normalize_tags, NewTask, Subtask, Task, TaskPatch, TaskStatus};
pub use timestamp::Timestamp;
