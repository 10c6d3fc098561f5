use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::cli::handlers::{Context, Session, open_remote};
use crate::io::state::{UiState, default_state_path, read_ui_state, write_ui_state};
use crate::model::config::Config;
use crate::model::task::{Filter, Task, TaskId};
use crate::ops::{Change, SubscriptionId, TaskManager};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit,
    Move,
}

/// What the edit line will do on Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    NewTask,
    Rename(TaskId),
}

/// An action waiting for the same key a second time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirm {
    Quit,
    Reload,
}

/// One-line message shown in the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub session: Session,
    pub filter: Filter,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Cursor index into the filtered list
    pub cursor: usize,
    /// First visible row of the list
    pub scroll_offset: usize,
    /// Help overlay visible
    pub show_help: bool,
    pub pending: Option<PendingConfirm>,
    pub status: Option<StatusMessage>,
    /// Edit line contents and byte cursor
    pub edit_buffer: String,
    pub edit_cursor: usize,
    pub edit_target: Option<EditTarget>,
    /// Collection order when move mode started, restored on Esc
    pub move_original: Option<Vec<Task>>,
    /// Groups of soft-deleted ids, most recent last
    pub deleted_stack: Vec<Vec<TaskId>>,
    changes: Receiver<Change>,
    subscription: SubscriptionId,
}

impl App {
    pub fn new(mut session: Session, config: &Config) -> Self {
        let (tx, rx) = mpsc::channel();
        let subscription = session.subscribe(move |change| {
            let _ = tx.send(change.clone());
        });

        App {
            session,
            filter: Filter::All,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            show_help: false,
            pending: None,
            status: None,
            edit_buffer: String::new(),
            edit_cursor: 0,
            edit_target: None,
            move_original: None,
            deleted_stack: Vec::new(),
            changes: rx,
            subscription,
        }
    }

    /// Tasks shown under the current filter, in collection order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.session.filtered(self.filter)
    }

    pub fn cursor_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.cursor).copied()
    }

    pub fn cursor_task_id(&self) -> Option<TaskId> {
        self.cursor_task().map(|t| t.id)
    }

    /// Keep the cursor inside the filtered list
    pub fn clamp_cursor(&mut self) {
        let len = self.visible_tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Put the cursor on `id` if it is visible under the current filter
    pub fn select_task(&mut self, id: TaskId) {
        if let Some(pos) = self.visible_tasks().iter().position(|t| t.id == id) {
            self.cursor = pos;
        }
    }

    /// Number of visible tasks passing `filter`, for the tab bar
    pub fn count_for(&self, filter: Filter) -> usize {
        self.session.filtered(filter).len()
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Turn pending change notifications into a status message. An error set
    /// during the same key press stays visible.
    pub fn drain_changes(&mut self) {
        let mut latest = None;
        while let Ok(change) = self.changes.try_recv() {
            latest = Some(change);
        }
        let Some(change) = latest else {
            return;
        };
        if self.status.as_ref().is_some_and(|s| s.is_error) {
            return;
        }
        if let Some(text) = describe_change(&change) {
            self.set_status(text);
        }
    }

    /// Stop receiving change notifications
    pub fn detach(&mut self) {
        self.session.unsubscribe(self.subscription);
    }

    pub fn restore_ui_state(&mut self, state: &UiState) {
        self.filter = state.filter;
        self.cursor = state.cursor;
        self.clamp_cursor();
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            filter: self.filter,
            cursor: self.cursor,
        }
    }
}

/// Status text for a change, or None for changes that speak for themselves
pub fn describe_change(change: &Change) -> Option<String> {
    match change {
        Change::Loaded { count } => Some(format!(
            "loaded {} task{}",
            count,
            if *count == 1 { "" } else { "s" }
        )),
        Change::Created(id) => Some(format!("added #{}", id)),
        Change::Updated(_) | Change::Reordered => None,
        Change::Removed(id) => Some(format!("deleted #{} (z to restore)", id)),
        Change::Restored(id) => Some(format!("restored #{}", id)),
        Change::ClearedCompleted(count) => Some(format!(
            "cleared {} completed (z to restore)",
            count
        )),
        Change::Saved => Some("saved".to_string()),
        Change::Undone => Some("reverted to previous fetch".to_string()),
    }
}

fn save_ui_state(app: &App) {
    let Some(path) = default_state_path() else {
        return;
    };
    if let Err(e) = write_ui_state(&path, &app.ui_state()) {
        warn!(error = %e, path = %path.display(), "could not save UI state");
    }
}

/// Run the TUI application
pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let remote = open_remote(ctx)?;
    let mut session = TaskManager::new(remote, ctx.config.history_depth());
    // A missing token is not fatal; the first write will surface any rejection
    if let Err(e) = session.connect() {
        debug!(error = %e, "starting without a session token");
    }

    let mut app = App::new(session, &ctx.config);
    if let Err(e) = app.session.load_all() {
        app.set_error(format!("load failed: {}", e));
    }
    app.drain_changes();

    // Restore saved UI state
    if let Some(state) = default_state_path().and_then(|p| read_ui_state(&p)) {
        app.restore_ui_state(&state);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);
    app.detach();
    if app.session.is_dirty() {
        info!("quit with unsaved changes");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            app.drain_changes();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::app_with_titles;

    #[test]
    fn test_cursor_clamps_to_filtered_list() {
        let mut app = app_with_titles(&["a", "b", "c"]);
        app.cursor = 10;
        app.clamp_cursor();
        assert_eq!(app.cursor, 2);

        app.session.toggle_completed(TaskId(1));
        app.filter = Filter::Completed;
        app.clamp_cursor();
        assert_eq!(app.cursor, 0);
        assert_eq!(app.cursor_task_id(), Some(TaskId(1)));
    }

    #[test]
    fn test_changes_become_status() {
        let mut app = app_with_titles(&["a"]);
        app.session.remove(TaskId(1));
        app.drain_changes();
        assert_eq!(app.status.as_ref().unwrap().text, "deleted #1 (z to restore)");
        assert!(!app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn test_error_status_survives_changes() {
        let mut app = app_with_titles(&["a"]);
        app.set_error("save failed");
        app.session.toggle_completed(TaskId(1));
        app.session.remove(TaskId(1));
        app.drain_changes();
        assert_eq!(app.status.as_ref().unwrap().text, "save failed");
    }

    #[test]
    fn test_detach_stops_notifications() {
        let mut app = app_with_titles(&["a"]);
        app.detach();
        app.session.remove(TaskId(1));
        app.drain_changes();
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_ui_state_round_trip() {
        let mut app = app_with_titles(&["a", "b"]);
        app.restore_ui_state(&UiState {
            filter: Filter::Active,
            cursor: 1,
        });
        assert_eq!(app.ui_state().filter, Filter::Active);
        assert_eq!(app.ui_state().cursor, 1);

        // Out-of-range cursor from an older session is clamped
        app.restore_ui_state(&UiState {
            filter: Filter::All,
            cursor: 99,
        });
        assert_eq!(app.cursor, 1);
    }
}
