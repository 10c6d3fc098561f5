use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::format_items_left;
use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

use super::spans_width;

/// Right-hand hint when no message is showing
fn mode_hint(app: &App) -> &'static str {
    match app.mode {
        Mode::Edit => "Enter save  Esc cancel",
        Mode::Move => "j/k move  Enter keep  Esc cancel",
        Mode::Navigate if app.show_key_hints => "a add  x toggle  d delete  s save  ? help",
        Mode::Navigate => "? help",
    }
}

/// Render the status row (bottom of screen): items left and the unsaved
/// marker on the left, the latest message or a key hint on the right
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![Span::styled(
        format!(" {}", format_items_left(app.session.items_remaining())),
        Style::default().fg(app.theme.text).bg(bg),
    )];
    if app.session.is_dirty() {
        spans.push(Span::styled(
            " \u{25CF} unsaved",
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    let (text, style) = match &app.status {
        Some(msg) if msg.is_error => (msg.text.as_str(), Style::default().fg(app.theme.red).bg(bg)),
        Some(msg) => (msg.text.as_str(), Style::default().fg(app.theme.text_bright).bg(bg)),
        None => (mode_hint(app), Style::default().fg(app.theme.dim).bg(bg)),
    };

    // Leave two cells of gap on the left and one at the right edge
    let room = width.saturating_sub(spans_width(&spans) + 3);
    let right = truncate_to_width(text, room);
    let padding = width.saturating_sub(spans_width(&spans) + display_width(&right) + 1);
    spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
    spans.push(Span::styled(right, style));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
