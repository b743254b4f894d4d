//! Sample tasks seeded into an empty board on first run

use crate::types::{Task, TaskId, TaskStatus, Timestamp};

/// The three tutorial tasks, one per column, all stamped `now`
pub fn sample_tasks(now: Timestamp) -> Vec<Task> {
    vec![
        Task::new(TaskId::from_string("1"), "Welcome to FocusFlow 🚀", now)
            .with_description("Try dragging this task to \"In Progress\"!")
            .with_tags(["tutorial"])
            .with_order(0),
        Task::new(TaskId::from_string("2"), "Offline First", now)
            .with_status(TaskStatus::InProgress)
            .with_description("All your data is stored locally in your browser.")
            .with_tags(["privacy"])
            .with_order(0),
        Task::new(TaskId::from_string("3"), "Strict Privacy", now)
            .with_status(TaskStatus::Completed)
            .with_description("No data ever leaves your device.")
            .with_order(0),
    ]
}
