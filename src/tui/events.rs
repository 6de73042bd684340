use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::time::Duration;

use crate::tui::app::{Mode, SidebarState};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;

/// Restores the terminal on drop, including during a panic unwind
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore on normal exit; drop becomes a no-op afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before the alternate screen so the message lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "terminal too small: current {}x{}, minimum {}x{}",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::debug!(width, height, "tui started");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                app.sidebar_state == SidebarState::Collapsed,
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Press only; Windows also reports releases
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::debug!("tui stopped");
    Ok(())
}

/// Apply a key press to the app. Returns true when the user asked to quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match app.mode {
        Mode::ConfirmDelete => {
            handle_delete_confirmation_modal(app, key_event);
            Ok(false)
        }
        Mode::Help => {
            if key_event.code == KeyCode::Esc
                || app.keys.help.matches(key_event.code, key_event.modifiers)
                || app.keys.quit.matches(key_event.code, key_event.modifiers)
            {
                app.exit_help_mode();
            }
            Ok(false)
        }
        Mode::View => handle_view_mode(app, key_event),
    }
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.toggle_delete_choice();
        }
        KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('y') => {
            app.delete_choice = crate::tui::app::DeleteChoice::Delete;
            app.confirm_delete();
        }
        KeyCode::Esc | KeyCode::Char('n') => app.cancel_delete(),
        _ => {}
    }
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let code = key_event.code;
    let modifiers = key_event.modifiers;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }
    if app.keys.quit.matches(code, modifiers) {
        return Ok(true);
    }

    if code == KeyCode::Up || app.keys.list_up.matches(code, modifiers) {
        app.move_selection_up()?;
    } else if code == KeyCode::Down || app.keys.list_down.matches(code, modifiers) {
        app.move_selection_down()?;
    } else if app.keys.water.matches(code, modifiers) {
        app.water_selected();
    } else if app.keys.start_flowering.matches(code, modifiers) {
        app.start_flowering_selected();
    } else if app.keys.delete.matches(code, modifiers) {
        app.request_delete();
    } else if app.keys.refresh.matches(code, modifiers) {
        app.refresh();
    } else if app.keys.toggle_sidebar.matches(code, modifiers) {
        app.toggle_sidebar();
    } else if app.keys.help.matches(code, modifiers) {
        app.enter_help_mode();
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plant;
    use crate::{Config, Database};
    use tempfile::TempDir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(names: &[&str]) -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("grow.db").to_str().unwrap()).unwrap();
        for (i, name) in names.iter().enumerate() {
            let mut plant = Plant::new(name.to_string(), "2024-01-01".to_string());
            plant.created_at = format!("2024-01-0{} 10:00:00", i + 1);
            db.insert_plant(&plant).unwrap();
        }
        (App::new(Config::default(), db).unwrap(), dir)
    }

    #[test]
    fn quit_keys() {
        let (mut app, _dir) = app_with(&[]);
        assert!(handle_key_event(&mut app, press(KeyCode::Char('q'))).unwrap());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key_event(&mut app, ctrl_c).unwrap());
    }

    #[test]
    fn navigation_with_arrows_and_bindings() {
        let (mut app, _dir) = app_with(&["A", "B", "C"]);
        handle_key_event(&mut app, press(KeyCode::Char('j'))).unwrap();
        handle_key_event(&mut app, press(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_index, 2);
        handle_key_event(&mut app, press(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn help_opens_and_closes() {
        let (mut app, _dir) = app_with(&[]);
        handle_key_event(&mut app, press(KeyCode::F(1))).unwrap();
        assert_eq!(app.mode, Mode::Help);
        // Quit key closes help instead of exiting
        assert!(!handle_key_event(&mut app, press(KeyCode::Char('q'))).unwrap());
        assert_eq!(app.mode, Mode::View);
    }

    #[test]
    fn delete_modal_cancel_and_confirm() {
        let (mut app, _dir) = app_with(&["A", "B"]);
        handle_key_event(&mut app, press(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        handle_key_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.plants.len(), 2);

        handle_key_event(&mut app, press(KeyCode::Char('d'))).unwrap();
        handle_key_event(&mut app, press(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.mode, Mode::View);
        assert_eq!(app.plants.len(), 1);
    }

    #[test]
    fn water_key_records_watering() {
        let (mut app, _dir) = app_with(&["A"]);
        handle_key_event(&mut app, press(KeyCode::Char('w'))).unwrap();
        assert_eq!(app.waterings.len(), 1);
    }

    #[test]
    fn sidebar_toggle() {
        let (mut app, _dir) = app_with(&[]);
        handle_key_event(&mut app, press(KeyCode::Char('b'))).unwrap();
        assert_eq!(app.sidebar_state, SidebarState::Collapsed);
    }
}
