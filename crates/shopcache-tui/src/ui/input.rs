//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState};
use crate::navigator::Route;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingNotice => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.dismiss_notice();
            }
            return false;
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.close_overlay();
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.quit();
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.close_overlay();
                }
                _ => {}
            }
            return false;
        }
        AppState::Quitting => return true,
        AppState::Normal => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return false;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        _ => {}
    }

    if matches!(app.navigator.current(), Route::Products) {
        handle_products_input(app, key);
    } else {
        handle_detail_input(app, key);
    }
    false
}

fn handle_products_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.move_selection_left(),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection_right(),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('r') => app.mount_products(),
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h')) {
        app.go_back();
    }
}
