use chrono::Utc;
use tracing::debug;

use super::{RemoteError, RemoteStore};
use crate::model::task::{Task, TaskId};

const MEMORY_TOKEN: &str = "memory-session-token";

/// In-process task store for `--offline` sessions and tests.
///
/// Ids are derived from the current time in milliseconds, bumped so they stay
/// strictly increasing. Nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    last_id: i64,
    require_token: bool,
    fail_next: Option<RemoteError>,
    last_token: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a fixed collection (soft-deleted entries allowed)
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let last_id = tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
        MemoryStore {
            tasks,
            last_id,
            ..Self::default()
        }
    }

    /// Reject mutating calls that do not carry the session token
    pub fn require_token(mut self) -> Self {
        self.require_token = true;
        self
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&mut self, error: RemoteError) {
        self.fail_next = Some(error);
    }

    /// Replace the stored collection, as another client would
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.last_id = self.last_id.max(tasks.iter().map(|t| t.id.0).max().unwrap_or(0));
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Token sent with the most recent mutating call
    pub fn last_token(&self) -> Option<&str> {
        self.last_token.as_deref()
    }

    /// Number of successful `save_all` calls
    pub fn saves(&self) -> usize {
        self.saves
    }

    fn take_failure(&mut self) -> Result<(), RemoteError> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn check_token(&mut self, token: Option<&str>) -> Result<(), RemoteError> {
        self.last_token = token.map(str::to_string);
        if self.require_token && token != Some(MEMORY_TOKEN) {
            return Err(RemoteError::Status {
                status: 403,
                body: "CSRF verification failed".into(),
            });
        }
        Ok(())
    }

    fn next_id(&mut self) -> Result<TaskId, RemoteError> {
        let floor = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| RemoteError::Unavailable("memory store ran out of task ids".into()))?;
        let id = Utc::now().timestamp_millis().max(floor);
        self.last_id = id;
        Ok(TaskId(id))
    }
}

impl RemoteStore for MemoryStore {
    fn fetch_token(&mut self) -> Result<String, RemoteError> {
        self.take_failure()?;
        Ok(MEMORY_TOKEN.to_string())
    }

    fn fetch_all(&mut self) -> Result<Vec<Task>, RemoteError> {
        self.take_failure()?;
        Ok(self.tasks.clone())
    }

    fn create(&mut self, title: &str, token: Option<&str>) -> Result<Task, RemoteError> {
        self.take_failure()?;
        self.check_token(token)?;
        if title.is_empty() {
            return Err(RemoteError::Status {
                status: 400,
                body: "Please provide a title for the to-do item".into(),
            });
        }
        let task = Task::new(self.next_id()?, title);
        debug!(id = %task.id, "memory store: created task");
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn save_all(&mut self, tasks: &[Task], token: Option<&str>) -> Result<(), RemoteError> {
        self.take_failure()?;
        self.check_token(token)?;
        self.tasks = tasks.to_vec();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut store = MemoryStore::new();
        let a = store.create("a", None).unwrap();
        let b = store.create("b", None).unwrap();
        let c = store.create("c", None).unwrap();
        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn test_ids_continue_past_seeded_tasks() {
        let far_future = i64::MAX / 2;
        let mut store = MemoryStore::with_tasks(vec![Task::new(TaskId(far_future), "seed")]);
        let task = store.create("next", None).unwrap();
        assert_eq!(task.id, TaskId(far_future + 1));
    }

    #[test]
    fn test_ids_exhausted_is_an_error() {
        let mut store = MemoryStore::with_tasks(vec![Task::new(TaskId(i64::MAX), "last")]);
        assert!(matches!(
            store.create("one more", None),
            Err(RemoteError::Unavailable(_))
        ));
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_fail_next_applies_once() {
        let mut store = MemoryStore::new();
        store.fail_next(RemoteError::Unavailable("down".into()));
        assert!(store.fetch_all().is_err());
        assert!(store.fetch_all().is_ok());
    }

    #[test]
    fn test_require_token() {
        let mut store = MemoryStore::new().require_token();
        assert!(matches!(
            store.create("a", None),
            Err(RemoteError::Status { status: 403, .. })
        ));
        let token = store.fetch_token().unwrap();
        assert!(store.create("a", Some(&token)).is_ok());
        assert_eq!(store.last_token(), Some(token.as_str()));
    }

    #[test]
    fn test_save_replaces_collection() {
        let mut store = MemoryStore::with_tasks(vec![Task::new(TaskId(1), "a")]);
        store
            .save_all(&[Task::new(TaskId(2), "b")], None)
            .unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, TaskId(2));
        assert_eq!(store.saves(), 1);
    }
}
