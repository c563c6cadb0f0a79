//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes. Fetches kicked
//! off here run in background tasks; nothing in this module blocks.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, LoadState, View, PAGE_SCROLL_SIZE};
use crate::models::ChatSortColumn;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_delete();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_delete();
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
        }
        KeyCode::Char('o') => {
            app.toggle_offline();
        }
        KeyCode::Char('u') => {
            app.refresh_current_view(false);
        }
        KeyCode::Char('f') => {
            app.refresh_current_view(true);
        }
        KeyCode::Char('r') => {
            if matches!(app.load, LoadState::Errored(_)) {
                app.retry();
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
        }
        KeyCode::PageDown => {
            app.move_selection(PAGE_SCROLL_SIZE as isize);
        }
        KeyCode::PageUp => {
            app.move_selection(-(PAGE_SCROLL_SIZE as isize));
        }
        KeyCode::Home => {
            app.move_selection(isize::MIN + 1);
        }
        KeyCode::End => {
            app.move_selection(isize::MAX);
        }
        _ => match app.view {
            View::Chats => handle_chats_input(app, key),
            View::Members => handle_members_input(app, key),
        },
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.filter.search.clear();
            app.clamp_selection();
        }
        KeyCode::Enter => {
            // Keep the query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.filter.search.pop();
            app.clamp_selection();
        }
        KeyCode::Char(c) => {
            app.filter.search.push(c);
            app.chat_selection = 0;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_chats_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.open_selected_chat();
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.filter.search.clear();
        }
        KeyCode::Char('d') => {
            app.request_delete_selected();
        }
        // Sort keys toggle direction when re-pressed
        KeyCode::Char('n') => {
            app.filter.select_column(ChatSortColumn::Title);
        }
        KeyCode::Char('m') => {
            app.filter.select_column(ChatSortColumn::MembersCount);
        }
        KeyCode::Char('y') => {
            app.filter.select_column(ChatSortColumn::Type);
        }
        KeyCode::Char('g') => {
            app.filter.type_filter = app.filter.type_filter.next();
            app.chat_selection = 0;
        }
        _ => {}
    }
}

fn handle_members_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.back_to_chats();
    }
}
