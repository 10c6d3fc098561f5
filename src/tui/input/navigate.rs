use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::TaskId;
use crate::tui::app::{App, EditTarget, Mode, PendingConfirm};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    // A confirmation only survives one key press
    let pending = app.pending.take();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.visible_tasks().len().saturating_sub(1);
        }

        KeyCode::Char('a') => begin_edit(app, EditTarget::NewTask, String::new()),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = app.cursor_task() {
                let target = EditTarget::Rename(task.id);
                let title = task.title.clone();
                begin_edit(app, target, title);
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => toggle_at_cursor(app),
        KeyCode::Char('d') => delete_at_cursor(app),
        KeyCode::Char('D') => clear_completed(app),
        KeyCode::Char('z') => restore_last_deleted(app),
        KeyCode::Char('m') => begin_move(app),

        KeyCode::Char('f') | KeyCode::Tab => {
            app.filter = app.filter.next();
            app.clamp_cursor();
        }
        KeyCode::BackTab => {
            app.filter = app.filter.next().next();
            app.clamp_cursor();
        }

        KeyCode::Char('s') => save(app),
        KeyCode::Char('u') => undo(app),
        KeyCode::Char('r') => {
            if app.session.is_dirty() && pending != Some(PendingConfirm::Reload) {
                app.pending = Some(PendingConfirm::Reload);
                app.set_status("unsaved changes: press r again to discard them and reload");
            } else {
                reload(app);
            }
        }

        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') => {
            if app.session.is_dirty() && pending != Some(PendingConfirm::Quit) {
                app.pending = Some(PendingConfirm::Quit);
                app.set_status("unsaved changes: press q again to quit, s to save");
            } else {
                app.should_quit = true;
            }
        }
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let len = app.visible_tasks().len();
    if len == 0 {
        app.cursor = 0;
        return;
    }
    app.cursor = app.cursor.saturating_add_signed(delta).min(len - 1);
}

fn begin_edit(app: &mut App, target: EditTarget, initial: String) {
    app.edit_cursor = initial.len();
    app.edit_buffer = initial;
    app.edit_target = Some(target);
    app.mode = Mode::Edit;
}

fn toggle_at_cursor(app: &mut App) {
    let Some(id) = app.cursor_task_id() else {
        return;
    };
    app.session.toggle_completed(id);
    // The task may have left the current filter
    app.clamp_cursor();
}

fn delete_at_cursor(app: &mut App) {
    let Some(id) = app.cursor_task_id() else {
        return;
    };
    if app.session.remove(id) {
        app.deleted_stack.push(vec![id]);
        app.clamp_cursor();
    }
}

fn clear_completed(app: &mut App) {
    let ids: Vec<TaskId> = app
        .session
        .visible()
        .iter()
        .filter(|t| t.completed)
        .map(|t| t.id)
        .collect();
    if app.session.remove_all_completed() == 0 {
        app.set_status("no completed tasks");
        return;
    }
    app.deleted_stack.push(ids);
    app.clamp_cursor();
}

fn restore_last_deleted(app: &mut App) {
    let Some(ids) = app.deleted_stack.pop() else {
        app.set_status("nothing to restore");
        return;
    };
    // A reload or undo since the delete drops soft-deleted tasks for good
    let restored: Vec<TaskId> = ids
        .into_iter()
        .filter(|id| app.session.restore(*id))
        .collect();
    match restored.first() {
        Some(first) => app.select_task(*first),
        None => app.set_status("deleted tasks are gone after a reload"),
    }
}

fn begin_move(app: &mut App) {
    if app.cursor_task().is_none() {
        return;
    }
    app.move_original = Some(app.session.tasks().to_vec());
    app.mode = Mode::Move;
    app.set_status("move: j/k to move, Enter to keep, Esc to cancel");
}

fn save(app: &mut App) {
    if let Err(e) = app.session.save() {
        app.set_error(format!("save failed: {}", e));
    }
}

fn undo(app: &mut App) {
    if !app.session.undo() {
        app.set_status("nothing to undo");
        return;
    }
    app.deleted_stack.clear();
    app.clamp_cursor();
}

fn reload(app: &mut App) {
    let selected = app.cursor_task_id();
    if let Err(e) = app.session.load_all() {
        app.set_error(format!("reload failed: {}", e));
        return;
    }
    app.deleted_stack.clear();
    app.clamp_cursor();
    if let Some(id) = selected {
        app.select_task(id);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::model::task::{Filter, TaskId};
    use crate::tui::app::{EditTarget, Mode};
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::app_with_titles;

    #[test]
    fn test_cursor_moves_within_bounds() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        handle_key(&mut app, ch('k'));
        assert_eq!(app.cursor, 0);
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, ch('j'));
        assert_eq!(app.cursor, 2);
        handle_key(&mut app, ch('g'));
        assert_eq!(app.cursor, 0);
        handle_key(&mut app, shift('G'));
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn test_toggle_marks_dirty_and_follows_filter() {
        let mut app = app_with_titles(&["a", "b"]);
        handle_key(&mut app, ch('f')); // active
        assert_eq!(app.filter, Filter::Active);
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch(' '));
        assert!(app.session.is_dirty());
        assert!(app.session.find(TaskId(2)).unwrap().completed);
        // "b" left the active view; cursor stays in range
        assert_eq!(app.visible_tasks().len(), 1);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_delete_then_restore() {
        let mut app = app_with_titles(&["a", "b"]);
        handle_key(&mut app, ch('d'));
        assert_eq!(app.visible_tasks().len(), 1);
        handle_key(&mut app, ch('z'));
        assert_eq!(app.visible_tasks().len(), 2);
        assert_eq!(app.cursor_task_id(), Some(TaskId(1)));
        handle_key(&mut app, ch('z'));
        assert_eq!(app.status.as_ref().unwrap().text, "nothing to restore");
    }

    #[test]
    fn test_clear_completed_is_one_restore_group() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, shift('D'));
        assert_eq!(app.visible_tasks().len(), 1);
        handle_key(&mut app, ch('z'));
        assert_eq!(app.visible_tasks().len(), 3);
    }

    #[test]
    fn test_enter_starts_rename_with_title() {
        let mut app = app_with_titles(&["buy milk"]);
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit_target, Some(EditTarget::Rename(TaskId(1))));
        assert_eq!(app.edit_buffer, "buy milk");
        assert_eq!(app.edit_cursor, "buy milk".len());
    }

    #[test]
    fn test_quit_needs_confirmation_when_dirty() {
        let mut app = app_with_titles(&["a"]);
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ch('q'));
        assert!(!app.should_quit);
        // Any other key cancels the pending quit
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('q'));
        assert!(!app.should_quit);
        handle_key(&mut app, ch('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_immediately_when_clean() {
        let mut app = app_with_titles(&["a"]);
        handle_key(&mut app, ch('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_save_clears_dirty() {
        let mut app = app_with_titles(&["a"]);
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ch('s'));
        assert!(!app.session.is_dirty());
    }

    #[test]
    fn test_reload_confirms_then_discards_edits() {
        let mut app = app_with_titles(&["a"]);
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ch('r'));
        assert!(app.session.is_dirty());
        handle_key(&mut app, ch('r'));
        assert!(!app.session.is_dirty());
        assert!(!app.session.find(TaskId(1)).unwrap().completed);
    }

    #[test]
    fn test_undo_with_single_snapshot_reports_nothing() {
        let mut app = app_with_titles(&["a"]);
        handle_key(&mut app, ch('u'));
        assert_eq!(app.status.as_ref().unwrap().text, "nothing to undo");
    }

    #[test]
    fn test_help_toggles() {
        let mut app = app_with_titles(&["a"]);
        handle_key(&mut app, ch('?'));
        assert!(app.show_help);
        // Keys are swallowed while help is open
        handle_key(&mut app, ch('d'));
        assert_eq!(app.visible_tasks().len(), 1);
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_ctrl_c_quits_even_when_dirty() {
        let mut app = app_with_titles(&["a"]);
        handle_key(&mut app, ch('x'));
        handle_key(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }
}
