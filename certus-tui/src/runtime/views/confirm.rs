use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_confirm_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            if let Some(action) = app.confirm.confirm() {
                enqueue_action(action_tx, Action::Confirmed(action));
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm.cancel(),
        _ => {}
    }
}
