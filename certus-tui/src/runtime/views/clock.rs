use crate::app::{App, GatedAction};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::ActionTx;
use super::handle_tab_key;

pub(super) fn handle_clock_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if handle_tab_key(key, app, action_tx) {
        return;
    }

    match key.code {
        KeyCode::Char('i') | KeyCode::Char('I') => {
            if !app.request(GatedAction::ClockIn) {
                app.set_status("Already clocked in");
            }
        }
        KeyCode::Char('o') | KeyCode::Char('O') => {
            if !app.request(GatedAction::ClockOut) {
                app.set_status("Not clocked in");
            }
        }
        _ => {}
    }
}
