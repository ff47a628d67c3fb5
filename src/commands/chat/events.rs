use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::ChatApp;
use crate::form::{Phase, SessionEvent};

pub fn handle_key(app: &mut ChatApp, key: KeyEvent) {
    // Ctrl+C bails out of any phase
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.session.phase() {
        Phase::Asking(_) => handle_input_keys(app, key.code),
        Phase::Reviewing => handle_review_keys(app, key.code),
        Phase::ConfirmingEdit(_) => handle_edit_dialog_keys(app, key.code),
        Phase::Submitting => {}
        Phase::Done => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.quit = true,
            _ => {}
        },
    }
}

fn handle_input_keys(app: &mut ChatApp, key_code: KeyCode) {
    match key_code {
        KeyCode::Char(c) => app.session.push_input(c),
        KeyCode::Backspace => app.session.pop_input(),
        KeyCode::Enter => {
            if app.session.can_submit_input() {
                app.dispatch(SessionEvent::InputSubmitted);
            }
        }
        KeyCode::Esc => app.quit = true,
        _ => {}
    }
}

fn handle_review_keys(app: &mut ChatApp, key_code: KeyCode) {
    match key_code {
        KeyCode::Down | KeyCode::Tab => app.select_next(),
        KeyCode::Up | KeyCode::BackTab => app.select_previous(),
        KeyCode::Enter => app.activate_selection(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit = true,
        _ => {}
    }
}

fn handle_edit_dialog_keys(app: &mut ChatApp, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.dispatch(SessionEvent::EditConfirmed);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.dispatch(SessionEvent::EditCancelled);
        }
        _ => {}
    }
}
