use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, EditTarget, Mode};
use crate::util::unicode::{next_boundary, prev_boundary, word_start_before};

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Enter => commit_edit(app),
        KeyCode::Esc => close_edit(app),

        KeyCode::Left => app.edit_cursor = prev_boundary(&app.edit_buffer, app.edit_cursor),
        KeyCode::Right => app.edit_cursor = next_boundary(&app.edit_buffer, app.edit_cursor),
        KeyCode::Home => app.edit_cursor = 0,
        KeyCode::End => app.edit_cursor = app.edit_buffer.len(),
        KeyCode::Char('a') if ctrl => app.edit_cursor = 0,
        KeyCode::Char('e') if ctrl => app.edit_cursor = app.edit_buffer.len(),

        KeyCode::Char('w') if ctrl => delete_word_before(app),
        KeyCode::Backspace if alt => delete_word_before(app),
        KeyCode::Char('u') if ctrl => {
            app.edit_buffer.replace_range(..app.edit_cursor, "");
            app.edit_cursor = 0;
        }
        KeyCode::Backspace => {
            let start = prev_boundary(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.replace_range(start..app.edit_cursor, "");
            app.edit_cursor = start;
        }
        KeyCode::Delete => {
            let end = next_boundary(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.replace_range(app.edit_cursor..end, "");
        }

        KeyCode::Char(c) if !ctrl => {
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn delete_word_before(app: &mut App) {
    let start = word_start_before(&app.edit_buffer, app.edit_cursor);
    app.edit_buffer.replace_range(start..app.edit_cursor, "");
    app.edit_cursor = start;
}

fn close_edit(app: &mut App) {
    app.mode = Mode::Navigate;
    app.edit_target = None;
    app.edit_buffer.clear();
    app.edit_cursor = 0;
}

/// Apply the edit line. Failures keep the editor open so the text is not lost.
fn commit_edit(app: &mut App) {
    let Some(target) = app.edit_target else {
        close_edit(app);
        return;
    };
    let title = app.edit_buffer.clone();
    match target {
        EditTarget::NewTask => match app.session.create(&title) {
            Ok(id) => {
                close_edit(app);
                app.select_task(id);
            }
            Err(e) => app.set_error(format!("add failed: {}", e)),
        },
        EditTarget::Rename(id) => match app.session.rename(id, &title) {
            Ok(true) => close_edit(app),
            Ok(false) => {
                close_edit(app);
                app.set_error(format!("task #{} is gone", id));
            }
            Err(e) => app.set_error(format!("rename failed: {}", e)),
        },
    }
}
