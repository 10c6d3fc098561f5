use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const NAVIGATION: &[(&str, &str)] = &[
    ("\u{2191}\u{2193}/jk", "Move cursor"),
    ("g/G", "Jump to top/bottom"),
    ("f/Tab", "Next filter"),
];

const TASKS: &[(&str, &str)] = &[
    ("a", "Add task"),
    ("e/Enter", "Rename task"),
    ("Space/x", "Toggle completed"),
    ("d", "Delete task"),
    ("D", "Clear completed"),
    ("z", "Restore last deleted"),
    ("m", "Move task (j/k, Enter, Esc)"),
];

const SYNC: &[(&str, &str)] = &[
    ("s", "Save to server"),
    ("r", "Reload from server"),
    ("u", "Undo last reload"),
];

const GLOBAL: &[(&str, &str)] = &[
    ("?", "Toggle this help"),
    ("q", "Quit (twice if unsaved)"),
    ("Ctrl+C", "Quit (immediate)"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 90, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    let sections = [
        ("Navigation", NAVIGATION),
        ("Tasks", TASKS),
        ("Sync", SYNC),
        ("Global", GLOBAL),
    ];
    for (i, (title, bindings)) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(format!(" {}", title), header_style)));
        for (key, desc) in bindings.iter() {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Key Bindings ", header_style))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 10;
    let padded_key = format!(" {:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
