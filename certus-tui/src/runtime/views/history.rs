use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::{enqueue_action, handle_tab_key};

pub(super) fn handle_history_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if handle_tab_key(key, app, action_tx) {
        return;
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.history_older_month(),
        KeyCode::Right | KeyCode::Char('l') => app.history_newer_month(),
        KeyCode::Down | KeyCode::Char('j') => app.history_scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.history_scroll_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => enqueue_action(action_tx, Action::LoadHistory),
        _ => {}
    }
}
