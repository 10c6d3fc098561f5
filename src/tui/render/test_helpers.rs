use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::cli::handlers::Session;
use crate::model::config::Config;
use crate::model::task::{Task, TaskId};
use crate::ops::TaskManager;
use crate::remote::{MemoryStore, RemoteError};
use crate::tui::app::App;

pub const TERM_W: u16 = 40;
pub const TERM_H: u16 = 10;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an in-memory store holding `titles` as ids 1..=n, loaded once.
pub fn app_with_titles(titles: &[&str]) -> App {
    let tasks = titles
        .iter()
        .enumerate()
        .map(|(i, title)| Task::new(TaskId(i as i64 + 1), *title))
        .collect();
    let mut session: Session = TaskManager::new(Box::new(MemoryStore::with_tasks(tasks)), 2);
    session.connect().unwrap();
    session.load_all().unwrap();
    App::new(session, &Config::default())
}

/// An empty, never-loaded App whose next remote call fails with `error`.
pub fn failing_app(error: RemoteError) -> App {
    let mut store = MemoryStore::new();
    store.fail_next(error);
    let session: Session = TaskManager::new(Box::new(store), 2);
    App::new(session, &Config::default())
}
