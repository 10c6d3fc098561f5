pub mod help_overlay;
pub mod list_view;
pub mod status_row;
pub mod tab_bar;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;

use super::app::App;
use crate::util::unicode::{cursor_col, next_boundary};

/// Main render function: tab bar, task list, status row, help on top
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }
}

/// Spans for the edit line with an inverted block cursor, scrolled so the
/// cursor stays within `width` cells.
pub(super) fn edit_spans<'a>(app: &App, width: usize, bg: ratatui::style::Color) -> Vec<Span<'a>> {
    let buf = app.edit_buffer.as_str();
    let cursor = app.edit_cursor.min(buf.len());
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor_style = Style::default()
        .fg(app.theme.background)
        .bg(app.theme.text_bright);

    // Drop leading graphemes until the cursor cell fits
    let mut start = 0;
    while start < cursor && cursor_col(&buf[start..], cursor - start) + 1 > width {
        start = next_boundary(buf, start);
    }

    let mut spans = Vec::new();
    let before = &buf[start..cursor];
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), text_style));
    }
    if cursor < buf.len() {
        let end = next_boundary(buf, cursor);
        spans.push(Span::styled(buf[cursor..end].to_string(), cursor_style));
        if end < buf.len() {
            spans.push(Span::styled(buf[end..].to_string(), text_style));
        }
    } else {
        spans.push(Span::styled(" ", cursor_style));
    }
    spans
}

/// Total display width of a run of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.width()).sum()
}
