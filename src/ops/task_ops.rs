use std::collections::HashMap;

use crate::model::task::{Filter, Task, TaskId};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task(tasks: &[Task], id: TaskId) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_task_mut(tasks: &mut [Task], id: TaskId) -> Option<&mut Task> {
    tasks.iter_mut().find(|t| t.id == id)
}

/// Lookup that ignores soft-deleted tasks
pub fn find_visible_mut(tasks: &mut [Task], id: TaskId) -> Option<&mut Task> {
    tasks.iter_mut().find(|t| t.id == id && !t.is_deleted)
}

/// Index of the task in the full collection (soft-deleted entries included)
pub fn position_of(tasks: &[Task], id: TaskId) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Mutations. Each returns whether anything changed.
// ---------------------------------------------------------------------------

/// Flip `completed` on the matching visible task
pub fn toggle_completed(tasks: &mut [Task], id: TaskId) -> bool {
    match find_visible_mut(tasks, id) {
        Some(task) => {
            task.completed = !task.completed;
            true
        }
        None => false,
    }
}

pub fn rename(tasks: &mut [Task], id: TaskId, title: &str) -> bool {
    match find_visible_mut(tasks, id) {
        Some(task) => {
            task.title = title.to_string();
            true
        }
        None => false,
    }
}

/// Mark the matching task deleted. Already-deleted tasks count as unchanged.
pub fn soft_delete(tasks: &mut [Task], id: TaskId) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) if !task.is_deleted => {
            task.is_deleted = true;
            true
        }
        _ => false,
    }
}

/// Clear the soft-delete marker on the matching task
pub fn restore(tasks: &mut [Task], id: TaskId) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) if task.is_deleted => {
            task.is_deleted = false;
            true
        }
        _ => false,
    }
}

/// Soft-delete every visible completed task. Returns how many were marked.
pub fn remove_completed(tasks: &mut [Task]) -> usize {
    let mut count = 0;
    for task in tasks.iter_mut().filter(|t| t.completed && !t.is_deleted) {
        task.is_deleted = true;
        count += 1;
    }
    count
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Move the element at `from` to `to` (extract, then reinsert). `to` is
/// clamped to the end of the list; an out-of-range `from` returns the list
/// unchanged.
pub fn reorder(tasks: &[Task], from: usize, to: usize) -> Vec<Task> {
    let mut result = tasks.to_vec();
    if from >= result.len() {
        return result;
    }
    let task = result.remove(from);
    let to = to.min(result.len());
    result.insert(to, task);
    result
}

/// Whether `candidate` holds exactly the same ids as `current`, each the same
/// number of times.
pub fn is_permutation(current: &[Task], candidate: &[Task]) -> bool {
    if current.len() != candidate.len() {
        return false;
    }
    let mut counts: HashMap<TaskId, isize> = HashMap::new();
    for task in current {
        *counts.entry(task.id).or_default() += 1;
    }
    for task in candidate {
        *counts.entry(task.id).or_default() -= 1;
    }
    counts.values().all(|&c| c == 0)
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Tasks that are not soft-deleted, in collection order
pub fn visible(tasks: &[Task]) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(|t| t.is_visible())
}

/// Visible tasks passing `filter`
pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    visible(tasks).filter(|t| filter.matches(t)).collect()
}

/// Count of visible tasks that are not completed ("items left")
pub fn items_remaining(tasks: &[Task]) -> usize {
    visible(tasks).filter(|t| !t.completed).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Task> {
        let mut done = Task::new(TaskId(2), "Walk dog");
        done.completed = true;
        let mut gone = Task::new(TaskId(4), "Old errand");
        gone.completed = true;
        gone.is_deleted = true;
        vec![
            Task::new(TaskId(1), "Buy milk"),
            done,
            Task::new(TaskId(3), "Write report"),
            gone,
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn test_toggle_only_target() {
        let mut tasks = sample();
        assert!(toggle_completed(&mut tasks, TaskId(1)));
        assert!(tasks[0].completed);
        assert!(tasks[1].completed);
        assert!(!tasks[2].completed);
    }

    #[test]
    fn test_toggle_unknown_is_noop() {
        let mut tasks = sample();
        let before = tasks.clone();
        assert!(!toggle_completed(&mut tasks, TaskId(99)));
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_toggle_ignores_deleted() {
        let mut tasks = sample();
        assert!(!toggle_completed(&mut tasks, TaskId(4)));
        assert!(tasks[3].completed);
    }

    #[test]
    fn test_rename() {
        let mut tasks = sample();
        assert!(rename(&mut tasks, TaskId(3), "Write summary"));
        assert_eq!(tasks[2].title, "Write summary");
        assert!(!rename(&mut tasks, TaskId(42), "nothing"));
    }

    #[test]
    fn test_soft_delete_and_restore() {
        let mut tasks = sample();
        assert!(soft_delete(&mut tasks, TaskId(1)));
        assert!(tasks[0].is_deleted);
        assert!(!soft_delete(&mut tasks, TaskId(1)));
        assert_eq!(ids(&tasks), vec![1, 2, 3, 4]);

        assert!(restore(&mut tasks, TaskId(1)));
        assert!(!tasks[0].is_deleted);
        assert!(!restore(&mut tasks, TaskId(1)));
    }

    #[test]
    fn test_remove_completed_idempotent() {
        let mut tasks = sample();
        assert_eq!(remove_completed(&mut tasks), 1);
        let once = tasks.clone();
        assert_eq!(remove_completed(&mut tasks), 0);
        assert_eq!(tasks, once);
        assert!(tasks[1].is_deleted);
        assert!(!tasks[0].is_deleted);
    }

    #[test]
    fn test_reorder_moves_single_element() {
        let tasks = sample();
        assert_eq!(ids(&reorder(&tasks, 0, 2)), vec![2, 3, 1, 4]);
        assert_eq!(ids(&reorder(&tasks, 3, 0)), vec![4, 1, 2, 3]);
        assert_eq!(ids(&reorder(&tasks, 1, 100)), vec![1, 3, 4, 2]);
        assert_eq!(ids(&reorder(&tasks, 9, 0)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_reorder_round_trip() {
        let tasks = sample();
        let moved = reorder(&tasks, 0, 3);
        let back = reorder(&moved, 3, 0);
        assert_eq!(ids(&back), ids(&tasks));
    }

    #[test]
    fn test_is_permutation() {
        let tasks = sample();
        assert!(is_permutation(&tasks, &reorder(&tasks, 0, 2)));
        assert!(!is_permutation(&tasks, &tasks[..3]));

        let mut dup = tasks.clone();
        dup[3] = tasks[0].clone();
        assert!(!is_permutation(&tasks, &dup));

        let mut foreign = tasks.clone();
        foreign[0].id = TaskId(50);
        assert!(!is_permutation(&tasks, &foreign));
    }

    #[test]
    fn test_items_remaining_skips_deleted_and_done() {
        let mut tasks = sample();
        assert_eq!(items_remaining(&tasks), 2);
        soft_delete(&mut tasks, TaskId(3));
        assert_eq!(items_remaining(&tasks), 1);
        assert_eq!(items_remaining(&[]), 0);
    }

    #[test]
    fn test_filter_tasks() {
        let tasks = sample();
        let all: Vec<i64> = filter_tasks(&tasks, Filter::All).iter().map(|t| t.id.0).collect();
        assert_eq!(all, vec![1, 2, 3]);
        let active: Vec<i64> = filter_tasks(&tasks, Filter::Active)
            .iter()
            .map(|t| t.id.0)
            .collect();
        assert_eq!(active, vec![1, 3]);
        let completed: Vec<i64> = filter_tasks(&tasks, Filter::Completed)
            .iter()
            .map(|t| t.id.0)
            .collect();
        assert_eq!(completed, vec![2]);
    }
}
