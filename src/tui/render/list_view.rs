use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::checkbox;
use crate::model::task::{Filter, Task};
use crate::tui::app::{App, EditTarget, Mode};
use crate::util::unicode::truncate_to_width;

use super::{edit_spans, spans_width};

/// Render the filtered task list, with the edit line when editing
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let visible_height = area.height as usize;
    let width = area.width as usize;
    let adding = app.mode == Mode::Edit && app.edit_target == Some(EditTarget::NewTask);

    // Rows: every filtered task, plus the new-task line while adding
    let row_count = app.visible_tasks().len() + usize::from(adding);
    let cursor = if adding {
        row_count.saturating_sub(1)
    } else {
        app.cursor.min(row_count.saturating_sub(1))
    };
    if cursor < app.scroll_offset {
        app.scroll_offset = cursor;
    } else if visible_height > 0 && cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = cursor.saturating_sub(visible_height - 1);
    }

    if row_count == 0 {
        let msg = match app.filter {
            Filter::All => " No tasks. Press a to add one.".to_string(),
            other => format!(" No {} tasks", other.label()),
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let scroll = app.scroll_offset;
    let tasks = app.visible_tasks();
    let end = row_count.min(scroll + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);

    for row in scroll..end {
        let is_cursor = row == cursor;
        let line = match tasks.get(row) {
            Some(task) => {
                let renaming = app.mode == Mode::Edit
                    && app.edit_target == Some(EditTarget::Rename(task.id));
                render_task_line(app, task, is_cursor, renaming, width)
            }
            None => render_new_task_line(app, width),
        };
        lines.push(line);
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn render_task_line<'a>(
    app: &App,
    task: &Task,
    is_cursor: bool,
    renaming: bool,
    width: usize,
) -> Line<'a> {
    let row_bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let mut spans: Vec<Span> = Vec::new();

    // Column 0: cursor bar, or a move marker while reordering
    if is_cursor && app.mode == Mode::Move {
        spans.push(Span::styled(
            "\u{2195}",
            Style::default().fg(app.theme.highlight).bg(row_bg),
        ));
    } else if is_cursor {
        spans.push(Span::styled(
            "\u{258E}",
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        ));
    } else {
        spans.push(Span::styled(" ", Style::default().bg(row_bg)));
    }

    spans.push(Span::styled(
        checkbox(task.completed),
        Style::default()
            .fg(app.theme.checkbox_color(task.completed))
            .bg(row_bg),
    ));
    spans.push(Span::styled(" ", Style::default().bg(row_bg)));

    let title_width = width.saturating_sub(spans_width(&spans));
    if renaming {
        spans.extend(edit_spans(app, title_width, row_bg));
    } else {
        let mut title_style = Style::default().bg(row_bg);
        title_style = if task.completed {
            title_style
                .fg(app.theme.dim)
                .add_modifier(Modifier::CROSSED_OUT)
        } else if is_cursor {
            title_style.fg(app.theme.text_bright)
        } else {
            title_style.fg(app.theme.text)
        };
        spans.push(Span::styled(
            truncate_to_width(&task.title, title_width),
            title_style,
        ));
    }

    // Fill the row so the cursor background spans the full width
    let used = spans_width(&spans);
    if used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(row_bg),
        ));
    }
    Line::from(spans)
}

fn render_new_task_line<'a>(app: &App, width: usize) -> Line<'a> {
    let row_bg = app.theme.selection_bg;
    let mut spans: Vec<Span> = vec![
        Span::styled(
            "\u{258E}",
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        ),
        Span::styled(
            checkbox(false),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ),
        Span::styled(" ", Style::default().bg(row_bg)),
    ];
    let title_width = width.saturating_sub(spans_width(&spans));
    spans.extend(edit_spans(app, title_width, row_bg));
    let used = spans_width(&spans);
    if used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(row_bg),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskId;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;

    fn render(app: &mut App) -> String {
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_list_view(frame, app, area);
        })
    }

    #[test]
    fn list_shows_checkboxes_and_cursor() {
        let mut app = app_with_titles(&["Buy milk", "Walk dog"]);
        app.session.toggle_completed(TaskId(2));
        assert_snapshot!(render(&mut app), @r"
        ▎[ ] Buy milk
         [x] Walk dog
        ");
    }

    #[test]
    fn list_empty_messages() {
        let mut app = app_with_titles(&[]);
        assert_eq!(render(&mut app), " No tasks. Press a to add one.");
        app.filter = Filter::Completed;
        assert_eq!(render(&mut app), " No completed tasks");
    }

    #[test]
    fn list_hides_deleted_and_filtered() {
        let mut app = app_with_titles(&["Buy milk", "Walk dog", "Call mom"]);
        app.session.remove(TaskId(1));
        app.session.toggle_completed(TaskId(3));
        app.filter = Filter::Active;
        let output = render(&mut app);
        assert!(output.contains("Walk dog"));
        assert!(!output.contains("Buy milk"));
        assert!(!output.contains("Call mom"));
    }

    #[test]
    fn list_truncates_long_titles() {
        let mut app = app_with_titles(&["a very long task title that will not fit in forty cells"]);
        let output = render(&mut app);
        assert!(output.ends_with('\u{2026}'));
        assert!(output.lines().all(|l| crate::util::unicode::display_width(l) <= 40));
    }

    #[test]
    fn list_scrolls_to_cursor() {
        let titles: Vec<String> = (1..=30).map(|i| format!("task {}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let mut app = app_with_titles(&refs);
        app.cursor = 25;
        let output = render(&mut app);
        assert!(output.contains("task 26"));
        assert!(!output.contains("task 1\n"));
        assert_eq!(app.scroll_offset, 16);
    }

    #[test]
    fn list_shows_new_task_line_while_adding() {
        let mut app = app_with_titles(&["Buy milk"]);
        app.mode = Mode::Edit;
        app.edit_target = Some(EditTarget::NewTask);
        app.edit_buffer = "Walk".into();
        app.edit_cursor = 4;
        assert_snapshot!(render(&mut app), @r"
         [ ] Buy milk
        ▎[ ] Walk
        ");
    }

    #[test]
    fn list_shows_rename_buffer_in_place() {
        let mut app = app_with_titles(&["Buy milk", "Walk dog"]);
        app.mode = Mode::Edit;
        app.edit_target = Some(EditTarget::Rename(TaskId(1)));
        app.edit_buffer = "Buy bread".into();
        app.edit_cursor = 0;
        let output = render(&mut app);
        assert!(output.contains("Buy bread"));
        assert!(!output.contains("Buy milk"));
    }
}
