//! TaskStore - in-memory board state with change notification
//!
//! The store holds two pieces of state, the task list and the selected task id.
//! It carries no business logic: mutations go through
//! [`TaskService`](crate::TaskService), which keeps the store and the
//! persistence adapter in step. Every derived view is recomputed from the
//! current state on each call, so views never go stale.
//!
//! The store is a cheap, cloneable handle. Clones share the same state and the
//! same subscriber channel.

use crate::types::{Task, TaskId, TaskStatus};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Capacity of the change notification channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notification sent to subscribers after each mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The task list was replaced or edited
    TasksChanged,
    /// The selected task id changed
    SelectionChanged,
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<Task>,
    selected_task_id: Option<TaskId>,
}

/// Shared handle to the session's task state
#[derive(Clone)]
pub struct TaskStore {
    state: Arc<RwLock<StoreState>>,
    events: broadcast::Sender<StoreEvent>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            events,
        }
    }

    /// Create a store holding `tasks`
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::new();
        store.write().tasks = tasks;
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().expect("TaskStore lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().expect("TaskStore lock poisoned")
    }

    fn notify(&self, event: StoreEvent) {
        // Sending only fails when nobody is subscribed
        let _ = self.events.send(event);
    }

    /// Receive a [`StoreEvent`] for every subsequent mutation
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Raw state
    // =========================================================================

    /// Snapshot of the task list, in collection order
    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().tasks.is_empty()
    }

    /// Task with the given id
    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.read().tasks.iter().find(|t| &t.id == id).cloned()
    }

    /// Replace the whole task list
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.write().tasks = tasks;
        self.notify(StoreEvent::TasksChanged);
    }

    /// Edit the task list in place and notify subscribers
    pub fn update_tasks<R>(&self, f: impl FnOnce(&mut Vec<Task>) -> R) -> R {
        let result = {
            let mut state = self.write();
            f(&mut state.tasks)
        };
        self.notify(StoreEvent::TasksChanged);
        result
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.read().selected_task_id.clone()
    }

    pub fn set_selected_task_id(&self, id: Option<TaskId>) {
        self.write().selected_task_id = id;
        self.notify(StoreEvent::SelectionChanged);
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Newest first, by `created_at`
    pub fn sorted_by_recency(&self) -> Vec<Task> {
        let mut tasks = self.tasks();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    /// Every task that is not completed, in collection order
    pub fn active_tasks(&self) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| t.is_active())
            .cloned()
            .collect()
    }

    /// The selected task; `None` when nothing is selected or the id is gone
    pub fn selected_task(&self) -> Option<Task> {
        let state = self.read();
        let id = state.selected_task_id.as_ref()?;
        state.tasks.iter().find(|t| &t.id == id).cloned()
    }

    /// Tasks whose title or description contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| t.matches(query))
            .cloned()
            .collect()
    }

    /// One column, sorted by `order`
    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        column_tasks(&self.read().tasks, status)
    }

    /// All three columns in display order
    pub fn board(&self) -> BoardView {
        BoardView::from_tasks(&self.read().tasks)
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("TaskStore")
            .field("tasks", &state.tasks.len())
            .field("selected_task_id", &state.selected_task_id)
            .finish()
    }
}

fn column_tasks(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    let mut column: Vec<Task> = tasks.iter().filter(|t| t.status == status).cloned().collect();
    // Stable: equal keys keep collection order
    column.sort_by_key(Task::sort_order);
    column
}

/// Tasks of one status, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

impl ColumnView {
    pub fn title(&self) -> &'static str {
        self.status.title()
    }
}

/// The whole board, one column per status
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Group and sort `tasks` into columns
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let columns = TaskStatus::ALL
            .into_iter()
            .map(|status| ColumnView {
                status,
                tasks: column_tasks(tasks, status),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &ColumnView {
        self.columns
            .iter()
            .find(|c| c.status == status)
            .expect("board always has every column")
    }
}
