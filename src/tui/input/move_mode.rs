use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::task_ops;
use crate::tui::app::{App, Mode};

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => shift_task(app, 1),
        KeyCode::Char('k') | KeyCode::Up => shift_task(app, -1),
        KeyCode::Enter | KeyCode::Char('m') => {
            app.move_original = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Esc => cancel_move(app),
        _ => {}
    }
}

/// Move the cursor task past its neighbour in the filtered list, stepping
/// over tasks the filter hides.
fn shift_task(app: &mut App, delta: isize) {
    let visible = app.visible_tasks();
    let Some(task) = visible.get(app.cursor) else {
        return;
    };
    let id = task.id;
    let Some(neighbour) = app
        .cursor
        .checked_add_signed(delta)
        .and_then(|i| visible.get(i))
        .map(|t| t.id)
    else {
        return;
    };
    let Some(to_index) = task_ops::position_of(app.session.tasks(), neighbour) else {
        return;
    };

    match app.session.move_task(id, to_index) {
        Ok(_) => app.select_task(id),
        Err(e) => app.set_error(format!("move failed: {}", e)),
    }
}

fn cancel_move(app: &mut App) {
    app.mode = Mode::Navigate;
    let Some(original) = app.move_original.take() else {
        return;
    };
    let unchanged = original
        .iter()
        .map(|t| t.id)
        .eq(app.session.tasks().iter().map(|t| t.id));
    if unchanged {
        return;
    }
    let id = app.cursor_task_id();
    if let Err(e) = app.session.reorder(original) {
        app.set_error(format!("could not restore order: {}", e));
        return;
    }
    if let Some(id) = id {
        app.select_task(id);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::model::task::{Filter, TaskId};
    use crate::tui::app::Mode;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::app_with_titles;

    fn titles(app: &crate::tui::app::App) -> Vec<String> {
        app.session.tasks().iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_move_down_and_accept() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        handle_key(&mut app, ch('m'));
        assert_eq!(app.mode, Mode::Move);
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('j'));
        assert_eq!(titles(&app), vec!["b", "c", "a"]);
        assert_eq!(app.cursor, 2);
        // Already at the bottom
        handle_key(&mut app, ch('j'));
        assert_eq!(titles(&app), vec!["b", "c", "a"]);

        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.session.is_dirty());
    }

    #[test]
    fn test_escape_restores_original_order() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('m'));
        handle_key(&mut app, ch('k'));
        assert_eq!(titles(&app), vec!["b", "a", "c"]);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(titles(&app), vec!["a", "b", "c"]);
        assert_eq!(app.cursor_task_id(), Some(TaskId(2)));
    }

    #[test]
    fn test_escape_without_moving_stays_clean() {
        let mut app = app_with_titles(&["a", "b"]);
        handle_key(&mut app, ch('m'));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(!app.session.is_dirty());
    }

    #[test]
    fn test_move_skips_hidden_tasks() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        // Complete "b", then move "a" below "c" in the active view
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ch('f'));
        assert_eq!(app.filter, Filter::Active);
        handle_key(&mut app, ch('g'));
        handle_key(&mut app, ch('m'));
        handle_key(&mut app, ch('j'));
        assert_eq!(titles(&app), vec!["b", "c", "a"]);
        assert_eq!(app.cursor_task_id(), Some(TaskId(1)));
    }
}
