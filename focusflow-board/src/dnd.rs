//! Drag gesture interpretation
//!
//! A drag starts on one task and ends either nowhere, on a column, or on
//! another task. [`decide`] turns the end of a gesture into a [`DragOutcome`]
//! without touching any state; [`DragOutcome::apply`] then drives a
//! [`DragTarget`], always changing status before position.

use crate::error::Result;
use crate::types::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::fmt;

/// What a drag ended over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// One of the three fixed column ids
    Column(TaskStatus),
    /// Any other id is taken to be a task
    Task(TaskId),
}

impl DropTarget {
    /// Column ids win over task ids of the same spelling
    pub fn parse(id: &str) -> Self {
        match TaskStatus::from_column_id(id) {
            Some(status) => Self::Column(status),
            None => Self::Task(TaskId::from_string(id)),
        }
    }
}

/// End of a drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub active_id: TaskId,
    /// `None` when the task was released over empty space
    pub over_id: Option<String>,
}

impl DragEnd {
    pub fn new(active_id: impl Into<TaskId>, over_id: Option<&str>) -> Self {
        Self {
            active_id: active_id.into(),
            over_id: over_id.map(str::to_string),
        }
    }
}

/// The store mutation a finished drag asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released with no drop target
    Cancelled,
    /// Dropped where nothing changes: onto itself, or onto its own column
    Unchanged,
    /// Dropped on a different column; position is left alone
    ChangeColumn { id: TaskId, status: TaskStatus },
    /// Dropped on another task. `status` is set when the two tasks sat in
    /// different columns and is applied before the move.
    Reorder {
        active_id: TaskId,
        over_id: TaskId,
        status: Option<TaskStatus>,
    },
}

impl DragOutcome {
    /// True when applying this outcome mutates nothing
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Unchanged)
    }

    /// Drive `target`: the status change first, then the reorder
    pub async fn apply<T: DragTarget + ?Sized>(&self, target: &T) -> Result<()> {
        match self {
            Self::Cancelled | Self::Unchanged => Ok(()),
            Self::ChangeColumn { id, status } => target.change_status(id, *status).await,
            Self::Reorder {
                active_id,
                over_id,
                status,
            } => {
                if let Some(status) = status {
                    target.change_status(active_id, *status).await?;
                }
                target.reorder(active_id, over_id).await
            }
        }
    }
}

impl fmt::Display for DragOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "drag cancelled"),
            Self::Unchanged => write!(f, "nothing to change"),
            Self::ChangeColumn { id, status } => write!(f, "moved {} to {}", id, status.title()),
            Self::Reorder {
                active_id,
                over_id,
                status: Some(status),
            } => write!(f, "moved {} to {} at {}", active_id, status.title(), over_id),
            Self::Reorder {
                active_id, over_id, ..
            } => write!(f, "moved {} to {}", active_id, over_id),
        }
    }
}

/// Receiver of drag outcomes
#[async_trait]
pub trait DragTarget: Send + Sync {
    /// Put the task in another column
    async fn change_status(&self, id: &TaskId, status: TaskStatus) -> Result<()>;

    /// Move `active_id` to the slot held by `over_id`
    async fn reorder(&self, active_id: &TaskId, over_id: &TaskId) -> Result<()>;
}

/// Tracks the task being dragged between the start and end of a gesture
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<Task>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the dragged task. Stays idle when `active_id` is not in `tasks`.
    pub fn drag_start(&mut self, active_id: &TaskId, tasks: &[Task]) -> bool {
        self.active = tasks.iter().find(|t| &t.id == active_id).cloned();
        self.active.is_some()
    }

    /// Task captured at drag start
    pub fn active_task(&self) -> Option<&Task> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Finish the gesture. The controller is idle afterwards whatever the outcome.
    pub fn drag_end(&mut self, event: &DragEnd, tasks: &[Task]) -> DragOutcome {
        let snapshot = self.active.take();
        decide(event, snapshot.as_ref(), tasks)
    }

    /// Abandon the gesture
    pub fn drag_cancel(&mut self) {
        self.active = None;
    }
}

/// Decide what a finished drag means.
///
/// The dragged task's status comes from `snapshot` when it matches the active
/// id, otherwise from `tasks`. A drop onto another task reorders even when
/// neither task is known; the status step needs both.
pub fn decide(event: &DragEnd, snapshot: Option<&Task>, tasks: &[Task]) -> DragOutcome {
    let Some(over_id) = event.over_id.as_deref() else {
        return DragOutcome::Cancelled;
    };

    let find = |id: &TaskId| tasks.iter().find(|t| &t.id == id);
    let active_status = snapshot
        .filter(|t| t.id == event.active_id)
        .or_else(|| find(&event.active_id))
        .map(|t| t.status);

    match DropTarget::parse(over_id) {
        DropTarget::Column(status) => match active_status {
            Some(current) if current != status => DragOutcome::ChangeColumn {
                id: event.active_id.clone(),
                status,
            },
            _ => DragOutcome::Unchanged,
        },
        DropTarget::Task(over_id) if over_id == event.active_id => DragOutcome::Unchanged,
        DropTarget::Task(over_id) => {
            let over_status = find(&over_id).map(|t| t.status);
            let status = match (active_status, over_status) {
                (Some(active), Some(over)) if active != over => Some(over),
                _ => None,
            };
            DragOutcome::Reorder {
                active_id: event.active_id.clone(),
                over_id,
                status,
            }
        }
    }
}
