//! Task types: Task, TaskStatus, Subtask and their create/patch forms

use super::ids::{SubtaskId, TaskId};
use super::timestamp::Timestamp;
use crate::error::BoardError;
use focusflow_store::Record;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board column a task lives in.
///
/// Columns have a fixed display order (`Todo`, `InProgress`, `Completed`) but a
/// task may move from any status to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// All statuses in column order
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Column id as used in persisted records and drop targets
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Column heading
    pub fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Parse a column id, `None` for anything else
    pub fn from_column_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == id)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_column_id(s).ok_or_else(|| {
            BoardError::invalid_value("status", format!("'{s}' is not one of todo, in-progress, completed"))
        })
    }
}

/// A checklist item nested inside a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Set when the task last entered `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_pomodoros: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_pomodoros: Option<u32>,
    /// Sort key within the column. Not necessarily contiguous or unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Task {
    /// Create a `todo` task with both timestamps set to `now`
    pub fn new(id: TaskId, title: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            created_at: now,
            updated_at: now,
            completed_at: None,
            due_date: None,
            tags: Vec::new(),
            subtasks: Vec::new(),
            estimated_pomodoros: None,
            completed_pomodoros: None,
            order: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = normalize_tags(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Column sort key; a missing `order` sorts as 0
    pub fn sort_order(&self) -> i64 {
        self.order.unwrap_or(0)
    }

    /// Anything not yet completed
    pub fn is_active(&self) -> bool {
        self.status != TaskStatus::Completed
    }

    /// Case-insensitive substring match on title or description
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }

    /// `completed/estimated` pomodoro progress, when an estimate exists
    pub fn pomodoro_progress(&self) -> Option<(u32, u32)> {
        self.estimated_pomodoros
            .map(|estimated| (self.completed_pomodoros.unwrap_or(0), estimated))
    }
}

impl Record for Task {
    type Patch = TaskPatch;

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

/// Trim tags, drop empty ones and duplicates, keeping first-seen order
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Input for creating a task. Only the title is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub tags: Vec<String>,
    pub subtasks: Vec<Subtask>,
    pub estimated_pomodoros: Option<u32>,
    /// Column position; defaults to the collection size
    pub order: Option<i64>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: Timestamp) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = subtasks;
        self
    }

    pub fn with_estimated_pomodoros(mut self, estimate: u32) -> Self {
        self.estimated_pomodoros = Some(estimate);
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// True when the title is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Build the full task: fresh id, `todo`, both timestamps `now`.
    /// `default_order` applies when no order was given.
    pub fn into_task(self, default_order: i64, now: Timestamp) -> Task {
        let description = self.description.filter(|d| !d.trim().is_empty());
        Task {
            description,
            due_date: self.due_date,
            tags: normalize_tags(self.tags),
            subtasks: self.subtasks,
            estimated_pomodoros: self.estimated_pomodoros,
            order: Some(self.order.unwrap_or(default_order)),
            ..Task::new(TaskId::new(), self.title.trim(), now)
        }
    }
}

/// Partial task update.
///
/// Outer `None` leaves a field untouched. For optional fields the inner value
/// sets (`Some(Some(v))`) or clears (`Some(None)`) it. Serializes to the JSON
/// object merged by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<Timestamp>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_pomodoros: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_pomodoros: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn with_due_date(mut self, due_date: Option<Timestamp>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = Some(subtasks);
        self
    }

    pub fn with_estimated_pomodoros(mut self, estimate: Option<u32>) -> Self {
        self.estimated_pomodoros = Some(estimate);
        self
    }

    pub fn with_completed_pomodoros(mut self, completed: Option<u32>) -> Self {
        self.completed_pomodoros = Some(completed);
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the present fields to `task` in place
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(updated_at) = self.updated_at {
            task.updated_at = updated_at;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        if let Some(subtasks) = &self.subtasks {
            task.subtasks = subtasks.clone();
        }
        if let Some(estimate) = self.estimated_pomodoros {
            task.estimated_pomodoros = estimate;
        }
        if let Some(completed) = self.completed_pomodoros {
            task.completed_pomodoros = completed;
        }
        if let Some(order) = self.order {
            task.order = Some(order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focusflow_store::merge_patch;

    fn task() -> Task {
        Task::new(TaskId::from_string("t1"), "Write report", Timestamp::from_millis(100))
            .with_description("Quarterly numbers")
            .with_tags(["work"])
            .with_order(2)
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!("completed".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let json = serde_json::to_value(task()).unwrap();
        assert_eq!(json["createdAt"], 100);
        assert_eq!(json["updatedAt"], 100);
        assert_eq!(json["status"], "todo");
        assert_eq!(json["order"], 2);
        assert!(json.get("dueDate").is_none());
        assert!(json.get("subtasks").is_none());
    }

    #[test]
    fn test_minimal_record_deserializes() {
        let json = r#"{"id":"1","title":"First","status":"todo","createdAt":100,"updatedAt":100}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.order, None);
        assert_eq!(task.sort_order(), 0);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(
            ["work", " home ", "work", "", "urgent"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(tags, vec!["work", "home", "urgent"]);
    }

    #[test]
    fn test_new_task_into_task() {
        let task = NewTask::new("  Plan sprint  ")
            .with_tags(["a", "a", "b"])
            .with_estimated_pomodoros(3)
            .into_task(5, Timestamp::from_millis(42));
        assert_eq!(task.title, "Plan sprint");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.order, Some(5));
        assert_eq!(task.tags, vec!["a", "b"]);
        assert_eq!(task.pomodoro_progress(), Some((0, 3)));
    }

    #[test]
    fn test_blank_title() {
        assert!(NewTask::new("   ").is_blank());
        assert!(!NewTask::new("x").is_blank());
    }

    #[test]
    fn test_patch_apply_matches_persisted_merge() {
        let patch = TaskPatch::new()
            .with_title("Write final report")
            .with_description(None)
            .with_status(TaskStatus::InProgress)
            .with_completed_pomodoros(Some(2));

        let mut in_memory = task();
        patch.apply_to(&mut in_memory);
        let persisted = merge_patch(&task(), &patch).unwrap();

        assert_eq!(in_memory, persisted);
        assert_eq!(in_memory.description, None);
        assert_eq!(in_memory.order, Some(2));
    }

    #[test]
    fn test_matches_search() {
        let task = task();
        assert!(task.matches("REPORT"));
        assert!(task.matches("quarterly"));
        assert!(!task.matches("invoice"));
        assert!(task.matches(""));
    }

    #[test]
    fn test_empty_patch() {
        assert!(TaskPatch::new().is_empty());
        assert!(!TaskPatch::new().with_order(1).is_empty());
    }
}
