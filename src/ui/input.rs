//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Tab, CONTEXT_FIELD, PRIORITY_FIELD};
use crate::models::ALL_DIMENSIONS;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Char('y') | KeyCode::Enter => {
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

    // Two-step wipe confirmation
    if matches!(app.state, AppState::ConfirmingWipe) {
        match key.code {
            KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Enter => {
                app.state = AppState::ConfirmingWipeFinal;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }
    if matches!(app.state, AppState::ConfirmingWipeFinal) {
        match key.code {
            KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Enter => {
                app.wipe_data();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // A failed save blocks until acknowledged
    if matches!(app.state, AppState::SaveErrorNotice) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.acknowledge_save_error();
        }
        return Ok(false);
    }

    // Context note editing
    if matches!(app.state, AppState::EditingContext) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => app.state = AppState::Normal,
            KeyCode::Backspace => app.pop_context_char(),
            KeyCode::Char(c) => app.push_context_char(c),
            _ => {}
        }
        return Ok(false);
    }

    // Import path entry
    if matches!(app.state, AppState::EnteringImportPath) {
        match key.code {
            KeyCode::Esc => app.state = AppState::Normal,
            KeyCode::Enter => app.finish_import(),
            KeyCode::Backspace => {
                app.import_path.pop();
            }
            KeyCode::Char(c) => app.import_path.push(c),
            _ => {}
        }
        return Ok(false);
    }

    // Digit keys set the focused score on the assessment form, so tab
    // switching by number only applies elsewhere.
    let scoring = app.current_tab == Tab::Assessment
        && app.last_submission.is_none()
        && app.form.field < ALL_DIMENSIONS.len();

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('u') if app.update_ready => {
            app.apply_update().await;
            return Ok(false);
        }
        KeyCode::Char(c @ '0'..='8') if scoring => {
            app.set_score(c as u8 - b'0');
            return Ok(false);
        }
        KeyCode::Char('1') => app.current_tab = Tab::Welcome,
        KeyCode::Char('2') => app.current_tab = Tab::Assessment,
        KeyCode::Char('3') => app.current_tab = Tab::History,
        KeyCode::Char('4') => app.current_tab = Tab::Settings,
        KeyCode::Left if app.current_tab != Tab::Assessment => {
            app.current_tab = app.current_tab.prev();
        }
        KeyCode::Right if app.current_tab != Tab::Assessment => {
            app.current_tab = app.current_tab.next();
        }
        _ => {
            match app.current_tab {
                Tab::Assessment => handle_assessment_input(app, key),
                Tab::History => handle_history_input(app, key),
                Tab::Settings => handle_settings_input(app, key),
                Tab::Welcome => {}
            }
        }
    }

    Ok(false)
}

fn handle_assessment_input(app: &mut App, key: KeyEvent) {
    // After a submission, the result panel replaces the form
    if app.last_submission.is_some() {
        if matches!(key.code, KeyCode::Char('n') | KeyCode::Enter) {
            app.reset_form();
        }
        return;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => app.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.prev_field(),
        KeyCode::Left => app.adjust_score(-1),
        KeyCode::Right => app.adjust_score(1),
        KeyCode::Char(' ') if app.form.field == PRIORITY_FIELD => app.cycle_priority(),
        KeyCode::Enter if app.form.field == CONTEXT_FIELD => {
            app.state = AppState::EditingContext;
        }
        KeyCode::Char('s') => app.submit_assessment(),
        _ => {}
    }
}

fn handle_history_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.history_up(),
        KeyCode::Down | KeyCode::Char('j') => app.history_down(),
        _ => {}
    }
}

fn handle_settings_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => app.export_data(),
        KeyCode::Char('i') => app.start_import(),
        KeyCode::Char('x') => app.state = AppState::ConfirmingWipe,
        _ => {}
    }
}
