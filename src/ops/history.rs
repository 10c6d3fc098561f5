use std::collections::VecDeque;

use crate::model::config::MIN_HISTORY_DEPTH;
use crate::model::task::Task;

/// Bounded history of fetched collections, newest last.
///
/// Only one level of undo is consumed at a time, so the buffer keeps a fixed
/// number of snapshots and drops the oldest when full.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    snapshots: VecDeque<Vec<Task>>,
    capacity: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(MIN_HISTORY_DEPTH)
    }
}

impl SnapshotHistory {
    /// Capacity is clamped to at least [`MIN_HISTORY_DEPTH`]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_HISTORY_DEPTH);
        SnapshotHistory {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a snapshot, evicting the oldest when at capacity
    pub fn push(&mut self, snapshot: Vec<Task>) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Drop the newest snapshot and return a copy of the one before it.
    /// Returns None (and changes nothing) with fewer than two snapshots.
    pub fn step_back(&mut self) -> Option<Vec<Task>> {
        if self.snapshots.len() < 2 {
            return None;
        }
        self.snapshots.pop_back();
        self.snapshots.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskId;

    fn snap(ids: &[i64]) -> Vec<Task> {
        ids.iter().map(|&i| Task::new(TaskId(i), format!("t{}", i))).collect()
    }

    #[test]
    fn test_capacity_clamped() {
        assert_eq!(SnapshotHistory::new(0).capacity(), 2);
        assert_eq!(SnapshotHistory::new(4).capacity(), 4);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = SnapshotHistory::new(2);
        history.push(snap(&[1]));
        history.push(snap(&[2]));
        history.push(snap(&[3]));
        assert_eq!(history.len(), 2);
        let prev = history.step_back().unwrap();
        assert_eq!(prev[0].id, TaskId(2));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_step_back_needs_two() {
        let mut history = SnapshotHistory::default();
        assert!(history.is_empty());
        assert!(history.step_back().is_none());
        history.push(snap(&[1]));
        assert!(history.step_back().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_repeated_cycles_stay_bounded() {
        let mut history = SnapshotHistory::new(3);
        for i in 0..100 {
            history.push(snap(&[i]));
            if i % 3 == 0 {
                history.step_back();
            }
        }
        assert!(history.len() <= 3);
    }
}
