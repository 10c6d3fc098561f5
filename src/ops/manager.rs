//! The task state manager: single owner of the session's task collection.
//!
//! Local edits are synchronous and only flip the dirty flag. Remote calls go
//! through a [`RemoteStore`]; failures leave local state as it was and are
//! returned to the caller after being logged.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::model::task::{Filter, Task, TaskId};
use crate::ops::history::SnapshotHistory;
use crate::ops::task_ops;
use crate::remote::{RemoteError, RemoteStore};

/// Error type for state manager operations
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("new order is not a permutation of the current tasks")]
    NotAPermutation,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A state change, delivered to subscribers after it has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Loaded { count: usize },
    Created(TaskId),
    Updated(TaskId),
    Removed(TaskId),
    Restored(TaskId),
    ClearedCompleted(usize),
    Reordered,
    Saved,
    Undone,
}

pub type SubscriptionId = usize;

type Listener = Box<dyn FnMut(&Change)>;

pub struct TaskManager<R: RemoteStore> {
    remote: R,
    tasks: Vec<Task>,
    dirty: bool,
    history: SnapshotHistory,
    token: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl<R: RemoteStore> TaskManager<R> {
    pub fn new(remote: R, history_depth: usize) -> Self {
        TaskManager {
            remote,
            tasks: Vec::new(),
            dirty: false,
            history: SnapshotHistory::new(history_depth),
            token: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }

    fn mark_dirty(&mut self, change: Change) {
        self.dirty = true;
        self.emit(change);
    }

    // -----------------------------------------------------------------------
    // Remote operations
    // -----------------------------------------------------------------------

    /// Fetch the anti-forgery token for the session
    pub fn connect(&mut self) -> Result<(), SyncError> {
        match self.remote.fetch_token() {
            Ok(token) => {
                debug!("connect: token obtained");
                self.token = Some(token);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "connect: could not fetch token, continuing without one");
                Err(e.into())
            }
        }
    }

    /// Replace the collection with the remote one (soft-deleted entries
    /// dropped), clear the dirty flag and record a snapshot.
    pub fn load_all(&mut self) -> Result<usize, SyncError> {
        let fetched = self.remote.fetch_all().inspect_err(|e| {
            warn!(error = %e, "load_all failed");
        })?;
        let tasks: Vec<Task> = fetched.into_iter().filter(Task::is_visible).collect();
        if let Some(id) = first_duplicate_id(&tasks) {
            let err = RemoteError::InvalidResponse(format!("duplicate task id {}", id));
            warn!(error = %err, "load_all failed");
            return Err(err.into());
        }
        let count = tasks.len();
        self.history.push(tasks.clone());
        self.tasks = tasks;
        self.dirty = false;
        info!(count, snapshots = self.history.len(), "loaded tasks");
        self.emit(Change::Loaded { count });
        Ok(count)
    }

    /// Persist a new task remotely, then append it locally
    pub fn create(&mut self, title: &str) -> Result<TaskId, SyncError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SyncError::EmptyTitle);
        }
        let task = self
            .remote
            .create(title, self.token.as_deref())
            .inspect_err(|e| warn!(error = %e, "create failed"))?;
        if task_ops::find_task(&self.tasks, task.id).is_some() {
            let err = RemoteError::InvalidResponse(format!("duplicate task id {}", task.id));
            warn!(error = %err, "create failed");
            return Err(err.into());
        }
        let id = task.id;
        info!(%id, "created task");
        self.tasks.push(task);
        self.mark_dirty(Change::Created(id));
        Ok(id)
    }

    /// POST the full collection. The dirty flag clears only on success.
    pub fn save(&mut self) -> Result<(), SyncError> {
        self.remote
            .save_all(&self.tasks, self.token.as_deref())
            .inspect_err(|e| warn!(error = %e, "save failed"))?;
        self.dirty = false;
        info!(count = self.tasks.len(), "saved tasks");
        self.emit(Change::Saved);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Local mutations
    // -----------------------------------------------------------------------

    /// Returns false (and changes nothing) when no visible task matches
    pub fn toggle_completed(&mut self, id: TaskId) -> bool {
        if !task_ops::toggle_completed(&mut self.tasks, id) {
            return false;
        }
        self.mark_dirty(Change::Updated(id));
        true
    }

    pub fn rename(&mut self, id: TaskId, title: &str) -> Result<bool, SyncError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SyncError::EmptyTitle);
        }
        if !task_ops::rename(&mut self.tasks, id, title) {
            return Ok(false);
        }
        self.mark_dirty(Change::Updated(id));
        Ok(true)
    }

    /// Soft-delete the matching task
    pub fn remove(&mut self, id: TaskId) -> bool {
        if !task_ops::soft_delete(&mut self.tasks, id) {
            return false;
        }
        self.mark_dirty(Change::Removed(id));
        true
    }

    /// Bring back a task soft-deleted since the last fetch
    pub fn restore(&mut self, id: TaskId) -> bool {
        if !task_ops::restore(&mut self.tasks, id) {
            return false;
        }
        self.mark_dirty(Change::Restored(id));
        true
    }

    /// Soft-delete every completed task. Returns the number affected.
    pub fn remove_all_completed(&mut self) -> usize {
        let count = task_ops::remove_completed(&mut self.tasks);
        if count > 0 {
            self.mark_dirty(Change::ClearedCompleted(count));
        }
        count
    }

    /// Replace the collection with a permutation of itself
    pub fn reorder(&mut self, new_order: Vec<Task>) -> Result<(), SyncError> {
        if !task_ops::is_permutation(&self.tasks, &new_order) {
            return Err(SyncError::NotAPermutation);
        }
        self.tasks = new_order;
        self.mark_dirty(Change::Reordered);
        Ok(())
    }

    /// Move one task to `to_index` in the full collection. Returns false when
    /// the task is unknown or already there.
    pub fn move_task(&mut self, id: TaskId, to_index: usize) -> Result<bool, SyncError> {
        let Some(from) = task_ops::position_of(&self.tasks, id) else {
            return Ok(false);
        };
        let to_index = to_index.min(self.tasks.len().saturating_sub(1));
        if from == to_index {
            return Ok(false);
        }
        let new_order = task_ops::reorder(&self.tasks, from, to_index);
        self.reorder(new_order)?;
        Ok(true)
    }

    /// Step back to the previous fetched snapshot.
    ///
    /// This reverts fetch reconciliation, not local edits made since the
    /// last fetch. Returns false with fewer than two snapshots.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.step_back() else {
            if self.history.is_empty() {
                debug!("undo: nothing loaded yet");
            } else {
                debug!("undo: only one snapshot");
            }
            return false;
        };
        self.tasks = previous;
        self.dirty = self.history.len() > 1;
        info!(snapshots = self.history.len(), dirty = self.dirty, "undo applied");
        self.emit(Change::Undone);
        true
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Count of visible, not-completed tasks
    pub fn items_remaining(&self) -> usize {
        task_ops::items_remaining(&self.tasks)
    }

    /// Full collection, soft-deleted entries included
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn visible(&self) -> Vec<&Task> {
        task_ops::visible(&self.tasks).collect()
    }

    pub fn filtered(&self, filter: Filter) -> Vec<&Task> {
        task_ops::filter_tasks(&self.tasks, filter)
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }
}

fn first_duplicate_id(tasks: &[Task]) -> Option<TaskId> {
    let mut seen = HashSet::new();
    tasks.iter().map(|t| t.id).find(|id| !seen.insert(*id))
}
