use serde::Serialize;

use crate::model::task::{Filter, Task, TaskId};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub filter: Filter,
    pub items_left: usize,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct CountJson {
    pub items_left: usize,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        title: task.title.clone(),
        completed: task.completed,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `[x]` for completed tasks, `[ ]` otherwise
pub fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    format!("{} #{} {}", checkbox(task.completed), task.id, task.title)
}

/// "1 item left" / "3 items left"
pub fn format_items_left(count: usize) -> String {
    if count == 1 {
        "1 item left".to_string()
    } else {
        format!("{} items left", count)
    }
}

/// Format a filtered listing with an items-left footer
pub fn format_listing(tasks: &[&Task], filter: Filter, items_left: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if tasks.is_empty() {
        match filter {
            Filter::All => lines.push("No tasks".to_string()),
            other => lines.push(format!("No {} tasks", other.label())),
        }
    } else {
        lines.extend(tasks.iter().map(|t| format_task_line(t)));
    }
    lines.push(String::new());
    lines.push(format_items_left(items_left));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        let mut t = Task::new(TaskId(id), title);
        t.completed = completed;
        t
    }

    #[test]
    fn test_format_task_line() {
        assert_eq!(format_task_line(&task(3, "Walk dog", true)), "[x] #3 Walk dog");
        assert_eq!(format_task_line(&task(1, "Buy milk", false)), "[ ] #1 Buy milk");
    }

    #[test]
    fn test_items_left_pluralization() {
        assert_eq!(format_items_left(0), "0 items left");
        assert_eq!(format_items_left(1), "1 item left");
        assert_eq!(format_items_left(2), "2 items left");
    }

    #[test]
    fn test_format_listing() {
        let a = task(1, "Buy milk", false);
        let b = task(2, "Walk dog", true);
        let lines = format_listing(&[&a, &b], Filter::All, 1);
        insta::assert_snapshot!(lines.join("\n"), @r"
        [ ] #1 Buy milk
        [x] #2 Walk dog

        1 item left
        ");
    }

    #[test]
    fn test_format_listing_empty_filter() {
        let lines = format_listing(&[], Filter::Completed, 4);
        assert_eq!(lines, vec!["No completed tasks", "", "4 items left"]);
    }

    #[test]
    fn test_list_json_shape() {
        let a = task(1, "Buy milk", false);
        let json = TaskListJson {
            filter: Filter::Active,
            items_left: 1,
            tasks: vec![task_to_json(&a)],
        };
        insta::assert_snapshot!(
            serde_json::to_string(&json).unwrap(),
            @r#"{"filter":"active","items_left":1,"tasks":[{"id":1,"title":"Buy milk","completed":false}]}"#
        );
    }
}
