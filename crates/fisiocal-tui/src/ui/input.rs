//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Focus, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Quitting => return true,
        AppState::Normal => {}
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,

        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        KeyCode::Enter | KeyCode::Tab => app.toggle_focus(),
        KeyCode::Esc => app.focus = Focus::Events,

        KeyCode::Char('p') => app.cycle_physiotherapist(true),
        KeyCode::Char('P') => app.cycle_physiotherapist(false),

        KeyCode::Char(']') => app.next_month(),
        KeyCode::Char('[') => app.prev_month(),
        KeyCode::Char('t') => app.go_today(),

        KeyCode::Char('r') => app.refresh_background(),
        _ => {}
    }

    false
}
