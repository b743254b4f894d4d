//! Rendering of tasks, boards and settings for the terminal

use comfy_table::{presets::UTF8_FULL, Table};
use focusflow_board::{AppSettings, BoardView, Task, Timestamp};
use serde::Serialize;

use crate::error::Result;

/// Maximum title length in list tables before truncation.
const MAX_TITLE_LENGTH: usize = 50;

/// Pretty JSON for `--json` output
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One row per task
pub fn task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Status", "Tags", "Due", "Pomodoros"]);

    for task in tasks {
        table.add_row(vec![
            task.id.to_string(),
            truncate(&task.title, MAX_TITLE_LENGTH),
            task.status.title().to_string(),
            task.tags.join(", "),
            task.due_date.map(date).unwrap_or_default(),
            pomodoros(task),
        ]);
    }

    table.to_string()
}

/// The three columns side by side, each sorted by position
pub fn board_table(board: &BoardView) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        board
            .columns
            .iter()
            .map(|c| format!("{} ({})", c.title(), c.tasks.len()))
            .collect::<Vec<_>>(),
    );

    let depth = board.columns.iter().map(|c| c.tasks.len()).max().unwrap_or(0);
    for row in 0..depth {
        table.add_row(
            board
                .columns
                .iter()
                .map(|c| {
                    c.tasks
                        .get(row)
                        .map(|t| format!("{}\n{}", truncate(&t.title, MAX_TITLE_LENGTH), t.id))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>(),
        );
    }

    table.to_string()
}

/// Every field of one task
pub fn task_detail(task: &Task) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    table.add_row(vec!["ID".to_string(), task.id.to_string()]);
    table.add_row(vec!["Title".to_string(), task.title.clone()]);
    if let Some(description) = &task.description {
        table.add_row(vec!["Description".to_string(), description.clone()]);
    }
    table.add_row(vec!["Status".to_string(), task.status.title().to_string()]);
    if !task.tags.is_empty() {
        table.add_row(vec!["Tags".to_string(), task.tags.join(", ")]);
    }
    if let Some(due) = task.due_date {
        table.add_row(vec!["Due".to_string(), date(due)]);
    }
    if task.estimated_pomodoros.is_some() || task.completed_pomodoros.is_some() {
        table.add_row(vec!["Pomodoros".to_string(), pomodoros(task)]);
    }
    if !task.subtasks.is_empty() {
        let subtasks = task
            .subtasks
            .iter()
            .map(|s| format!("[{}] {}", if s.completed { "x" } else { " " }, s.title))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec!["Subtasks".to_string(), subtasks]);
    }
    table.add_row(vec!["Created".to_string(), task.created_at.to_string()]);
    table.add_row(vec!["Updated".to_string(), task.updated_at.to_string()]);
    if let Some(completed) = task.completed_at {
        table.add_row(vec!["Completed".to_string(), completed.to_string()]);
    }

    table.to_string()
}

pub fn settings_table(settings: &AppSettings) -> String {
    let pomodoro = &settings.pomodoro;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Setting", "Value"]);

    let rows = [
        ("Theme", settings.theme.mode.to_string()),
        ("Work (min)", pomodoro.work_duration.to_string()),
        ("Short break (min)", pomodoro.short_break_duration.to_string()),
        ("Long break (min)", pomodoro.long_break_duration.to_string()),
        ("Long break every", pomodoro.long_break_interval.to_string()),
        ("Auto-start breaks", pomodoro.auto_start_breaks.to_string()),
        ("Auto-start pomodoros", pomodoro.auto_start_pomodoros.to_string()),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }

    table.to_string()
}

fn date(timestamp: Timestamp) -> String {
    timestamp
        .to_datetime()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.as_millis().to_string())
}

fn pomodoros(task: &Task) -> String {
    match task.pomodoro_progress() {
        Some((done, estimate)) => format!("{done}/{estimate}"),
        None => task
            .completed_pomodoros
            .map(|done| done.to_string())
            .unwrap_or_default(),
    }
}

/// Truncate to `max_len` characters, appending "..." when cut.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
