//! TaskService - task operations over the store and the persistence adapter
//!
//! Add, update and delete write to the adapter first and only touch the
//! in-memory store once the write succeeded; a failed write is returned to the
//! caller and memory is left as it was. Reorder is the exception: memory is
//! updated immediately and the changed `order` fields are persisted one by one,
//! best effort. A failed reorder write is logged, never rolled back.

use crate::dnd::DragTarget;
use crate::error::{BoardError, Result};
use crate::samples::sample_tasks;
use crate::state::TaskStore;
use crate::types::{normalize_tags, NewTask, Task, TaskId, TaskPatch, TaskStatus, Timestamp};
use async_trait::async_trait;
use focusflow_store::StorageAdapter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies task operations to a [`TaskStore`] and its persistence adapter
pub struct TaskService {
    adapter: Arc<dyn StorageAdapter<Task>>,
    store: TaskStore,
    seed_samples: bool,
}

impl TaskService {
    /// Create a service over `adapter`, publishing into `store`
    pub fn new(adapter: Arc<dyn StorageAdapter<Task>>, store: TaskStore) -> Self {
        Self {
            adapter,
            store,
            seed_samples: true,
        }
    }

    /// Whether an empty backend is seeded with the sample tasks on load
    pub fn with_seed_samples(mut self, seed: bool) -> Self {
        self.seed_samples = seed;
        self
    }

    /// The store this service publishes into
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Fetch every task and publish it.
    ///
    /// An empty backend is seeded with three sample tasks, each persisted
    /// before the set is published. Call once at startup.
    pub async fn load_tasks(&self) -> Result<Vec<Task>> {
        let stored = self.adapter.get_all().await?;

        let tasks = if stored.is_empty() && self.seed_samples {
            let samples = sample_tasks(Timestamp::now());
            for task in &samples {
                self.adapter.create(task).await?;
            }
            info!(count = samples.len(), "seeded sample tasks into empty board");
            samples
        } else {
            debug!(count = stored.len(), "loaded tasks");
            stored
        };

        self.store.set_tasks(tasks.clone());
        Ok(tasks)
    }

    /// Reload everything from the adapter
    pub async fn refresh_tasks(&self) -> Result<Vec<Task>> {
        self.load_tasks().await
    }

    /// Create a task at the end of the collection.
    ///
    /// The task is appended to the store only after the adapter accepted it.
    pub async fn add_task(&self, new_task: NewTask) -> Result<Task> {
        if new_task.is_blank() {
            return Err(BoardError::EmptyTitle);
        }

        let count = i64::try_from(self.store.len()).unwrap_or(i64::MAX);
        let task = new_task.into_task(count, Timestamp::now());

        self.adapter.create(&task).await?;
        self.store.update_tasks(|tasks| tasks.push(task.clone()));

        debug!(id = %task.id, order = ?task.order, "added task");
        Ok(task)
    }

    /// Stamp `updated_at`, persist `patch`, then merge it into memory.
    ///
    /// The adapter is called even when `id` is unknown in memory. Returns the
    /// updated in-memory task, or `None` if memory has no such task.
    pub async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        let mut patch = patch;
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BoardError::EmptyTitle);
        }
        if let Some(title) = patch.title.take() {
            patch.title = Some(title.trim().to_string());
        }
        if let Some(tags) = patch.tags.take() {
            patch.tags = Some(normalize_tags(tags));
        }

        let now = Timestamp::now();
        let current = self.store.get(id);

        if let (Some(status), Some(current), None) = (patch.status, &current, patch.completed_at) {
            if status != current.status {
                if status == TaskStatus::Completed {
                    patch.completed_at = Some(Some(now));
                } else if current.status == TaskStatus::Completed {
                    patch.completed_at = Some(None);
                }
            }
        }

        // Keep updated_at >= created_at even if the clock stepped back
        let updated_at = current.as_ref().map_or(now, |t| now.max(t.created_at));
        patch.updated_at = Some(updated_at);

        self.adapter.update(id.as_str(), &patch).await?;

        let updated = self.store.update_tasks(|tasks| {
            tasks.iter_mut().find(|t| &t.id == id).map(|task| {
                patch.apply_to(task);
                task.clone()
            })
        });

        match &updated {
            Some(_) => debug!(%id, "updated task"),
            None => debug!(%id, "update persisted for task not held in memory"),
        }
        Ok(updated)
    }

    /// Move a task to another column
    pub async fn update_task_status(&self, id: &TaskId, status: TaskStatus) -> Result<Option<Task>> {
        self.update_task(id, TaskPatch::new().with_status(status)).await
    }

    /// Move `active_id` to the index held by `over_id`, then renumber.
    ///
    /// Tasks strictly between the two positions shift by one slot. Every task's
    /// `order` becomes its zero-based index in the full collection; only the
    /// tasks whose `order` changed are persisted. Unknown ids leave the
    /// collection untouched. Returns the ids whose `order` changed.
    pub async fn reorder_tasks(&self, active_id: &TaskId, over_id: &TaskId) -> Result<Vec<TaskId>> {
        let now = Timestamp::now();

        let changed = self.store.update_tasks(|tasks| {
            let from = tasks.iter().position(|t| &t.id == active_id)?;
            let to = tasks.iter().position(|t| &t.id == over_id)?;

            let moved = tasks.remove(from);
            tasks.insert(to, moved);

            let mut changed = Vec::new();
            for (index, task) in tasks.iter_mut().enumerate() {
                let index = i64::try_from(index).unwrap_or(i64::MAX);
                if task.order != Some(index) {
                    task.order = Some(index);
                    task.updated_at = now.max(task.created_at);
                    changed.push((task.id.clone(), index, task.updated_at));
                }
            }
            Some(changed)
        });

        let Some(changed) = changed else {
            warn!(%active_id, %over_id, "reorder skipped: task not on the board");
            return Ok(Vec::new());
        };

        for (id, order, updated_at) in &changed {
            let patch = TaskPatch::new().with_order(*order).with_updated_at(*updated_at);
            if let Err(e) = self.adapter.update(id.as_str(), &patch).await {
                warn!(%id, order, error = %e, "failed to persist task order");
            }
        }

        debug!(%active_id, %over_id, changed = changed.len(), "reordered tasks");
        Ok(changed.into_iter().map(|(id, _, _)| id).collect())
    }

    /// Delete from the adapter, then from memory. Returns whether memory held it.
    pub async fn delete_task(&self, id: &TaskId) -> Result<bool> {
        self.adapter.delete(id.as_str()).await?;

        let removed = self.store.update_tasks(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| &t.id != id);
            tasks.len() != before
        });

        debug!(%id, removed, "deleted task");
        Ok(removed)
    }

    /// Open a task for detail view, or clear the selection
    pub fn select_task(&self, id: Option<TaskId>) {
        self.store.set_selected_task_id(id);
    }
}

#[async_trait]
impl DragTarget for TaskService {
    async fn change_status(&self, id: &TaskId, status: TaskStatus) -> Result<()> {
        self.update_task_status(id, status).await.map(|_| ())
    }

    async fn reorder(&self, active_id: &TaskId, over_id: &TaskId) -> Result<()> {
        self.reorder_tasks(active_id, over_id).await.map(|_| ())
    }
}
