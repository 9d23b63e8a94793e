use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{FileStorage, Storage, discover_project, load_project};
use crate::io::watcher::StoreWatcher;
use crate::model::{Config, Filter};
use crate::widget::{Focus, TodoWidget};

use super::input::{self, ClickTracker};
use super::layout::ListLayout;
use super::render;
use super::theme::Theme;

/// Upper bound on how long the loop sleeps waiting for input
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Main application state
pub struct App<S: Storage> {
    pub widget: TodoWidget<S>,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Geometry of the last rendered frame, used for mouse hit-testing
    pub layout: ListLayout,
    pub clicks: ClickTracker,
    pub should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(widget: TodoWidget<S>, config: &Config) -> Self {
        App {
            widget,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            layout: ListLayout::default(),
            clicks: ClickTracker::new(config.input.click_delay()),
            should_quit: false,
        }
    }

    /// Recompute the screen layout for a terminal of the given size.
    pub fn relayout(&mut self, width: u16, height: u16) {
        self.layout = ListLayout::build(
            Rect::new(0, 0, width, height),
            &self.widget,
            self.layout.scroll,
        );
    }

    /// Leave the loop. An open edit is committed first.
    pub fn quit(&mut self) {
        self.widget.focus_lost();
        self.should_quit = true;
    }

    /// How long to wait for input before the next pending toggle is due
    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.widget.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    fn ui_state(&self) -> UiState {
        let cursor = match self.widget.focus() {
            Focus::Row(id) => self.widget.visible_ids().iter().position(|v| *v == id),
            Focus::Input => None,
        };
        UiState {
            filter: self.widget.filter(),
            cursor,
        }
    }
}

/// Restore filter and focused row from .state.json. An explicit route wins
/// over the saved filter.
fn restore_ui_state<S: Storage>(app: &mut App<S>, data_dir: &Path, route: Option<&str>) {
    let saved = read_ui_state(data_dir).unwrap_or_default();
    let filter = route.map_or(saved.filter, Filter::from_route);
    app.widget.set_filter(filter);
    if let Some(cursor) = saved.cursor {
        app.widget.focus_visible_row(cursor);
    }
}

fn save_ui_state<S: Storage>(app: &App<S>, data_dir: &Path) {
    if let Err(e) = write_ui_state(data_dir, &app.ui_state()) {
        eprintln!("warning: could not save UI state: {e}");
    }
}

/// Run the TUI application
pub fn run(start_dir: &Path, route: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = discover_project(start_dir)?;
    let project = load_project(&root)?;

    let storage = FileStorage::for_project(&project);
    let watcher = match StoreWatcher::start(&storage.path()) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            eprintln!("warning: not watching for external changes: {e}");
            None
        }
    };
    let widget = TodoWidget::new(storage, &project.config);
    let mut app = App::new(widget, &project.config);
    restore_ui_state(&mut app, &project.data_dir, route);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app, &project.data_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<S: Storage>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                Event::Paste(text) => app.widget.paste(&text),
                _ => {}
            }
        }

        app.widget.tick(Instant::now());

        if let Some(watcher) = watcher
            && watcher.poll_changed()
        {
            app.widget.external_change();
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
    use crate::tui::render::test_helpers::app_with;
    use tempfile::TempDir;

    #[test]
    fn poll_timeout_tracks_next_deadline() {
        let mut app = app_with(r#"[{"text":"a","done":false}]"#);
        let t0 = Instant::now();
        assert_eq!(app.poll_timeout(t0), IDLE_POLL);

        let id = app.widget.list().at(0).unwrap().id;
        app.widget.click(crate::widget::Target::Label(id), 1, t0);
        assert_eq!(
            app.poll_timeout(t0 + Duration::from_millis(50)),
            Duration::from_millis(150)
        );
        assert_eq!(
            app.poll_timeout(t0 + Duration::from_millis(400)),
            Duration::ZERO
        );
    }

    #[test]
    fn ui_state_round_trip() {
        let dir = TempDir::new().unwrap();
        let payload = r#"[{"text":"a","done":false},{"text":"b","done":true},{"text":"c","done":true}]"#;

        let mut app = app_with(payload);
        app.widget.set_filter(Filter::Completed);
        app.widget.focus_visible_row(1);
        save_ui_state(&app, dir.path());

        let mut restored = app_with(payload);
        restore_ui_state(&mut restored, dir.path(), None);
        assert_eq!(restored.widget.filter(), Filter::Completed);
        let c = restored.widget.list().at(2).unwrap().id;
        assert_eq!(restored.widget.focus(), Focus::Row(c));
    }

    #[test]
    fn explicit_route_beats_saved_filter() {
        let dir = TempDir::new().unwrap();
        write_ui_state(
            dir.path(),
            &UiState {
                filter: Filter::Completed,
                cursor: None,
            },
        )
        .unwrap();
        let mut app = app_with("[]");
        restore_ui_state(&mut app, dir.path(), Some("#/active"));
        assert_eq!(app.widget.filter(), Filter::Active);
    }
}
