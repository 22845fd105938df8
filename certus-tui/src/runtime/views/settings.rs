use crate::app::{App, GatedAction};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::ActionTx;
use super::handle_tab_key;

pub(super) fn handle_settings_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if handle_tab_key(key, app, action_tx) {
        return;
    }

    if let KeyCode::Char('s') | KeyCode::Char('S') = key.code {
        app.request(GatedAction::SignOut);
    }
}
