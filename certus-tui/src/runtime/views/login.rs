use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_login_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            app.login.next_field();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.focused_input().insert(c);
        }
        KeyCode::Backspace => app.login.focused_input().backspace(),
        KeyCode::Left => app.login.focused_input().move_left(),
        KeyCode::Right => app.login.focused_input().move_right(),
        KeyCode::Enter => {
            if !app.login.submitting {
                enqueue_action(action_tx, Action::SubmitLogin);
            }
        }
        KeyCode::Esc => app.quit(),
        _ => {}
    }
}
