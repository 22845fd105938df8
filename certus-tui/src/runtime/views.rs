use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod clock;
mod confirm;
mod history;
mod login;
mod settings;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.confirm.is_visible() {
        confirm::handle_confirm_key(key, app, action_tx);
        return;
    }

    match app.current_view {
        View::Login => login::handle_login_key(key, app, action_tx),
        View::Clock => clock::handle_clock_key(key, app, action_tx),
        View::History => history::handle_history_key(key, app, action_tx),
        View::Settings => settings::handle_settings_key(key, app, action_tx),
    }
}

/// Keys shared by every tab. Returns true when the key was consumed.
fn handle_tab_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) -> bool {
    let before = app.current_view;
    match key.code {
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Char('1') => app.navigate_to(View::Clock),
        KeyCode::Char('2') => app.navigate_to(View::History),
        KeyCode::Char('3') => app.navigate_to(View::Settings),
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.quit();
            return true;
        }
        _ => return false,
    }

    if app.current_view == View::History && before != View::History {
        enqueue_action(action_tx, Action::LoadHistory);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Route;
    use crate::runtime::action_queue::channel;
    use certus_ledger::domain::{AuthUser, UserId};
    use time::OffsetDateTime;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn signed_in_app() -> App {
        let mut app = App::new(OffsetDateTime::now_utc());
        app.apply_route(
            Route::Tabs,
            Some(AuthUser {
                id: UserId::new("u-1"),
                email: None,
            }),
        );
        app
    }

    #[test]
    fn entering_history_tab_loads_entries() {
        let mut app = signed_in_app();
        let (tx, mut rx) = channel();

        handle_key(key(KeyCode::Char('2')), &mut app, &tx);
        assert_eq!(app.current_view, View::History);
        assert!(matches!(rx.try_recv(), Ok(Action::LoadHistory)));

        handle_key(key(KeyCode::Char('2')), &mut app, &tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn confirm_prompt_captures_keys() {
        let mut app = signed_in_app();
        let (tx, mut rx) = channel();

        handle_key(key(KeyCode::Char('i')), &mut app, &tx);
        assert!(app.confirm.is_visible());

        // Tab switching is blocked while the prompt is open.
        handle_key(key(KeyCode::Tab), &mut app, &tx);
        assert_eq!(app.current_view, View::Clock);

        handle_key(key(KeyCode::Char('y')), &mut app, &tx);
        assert!(!app.confirm.is_visible());
        assert!(matches!(
            rx.try_recv(),
            Ok(Action::Confirmed(crate::app::GatedAction::ClockIn))
        ));
    }

    #[test]
    fn cancelled_prompt_enqueues_nothing() {
        let mut app = signed_in_app();
        let (tx, mut rx) = channel();

        handle_key(key(KeyCode::Char('i')), &mut app, &tx);
        handle_key(key(KeyCode::Esc), &mut app, &tx);

        assert!(!app.confirm.is_visible());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ctrl_c_quits_from_login() {
        let mut app = App::new(OffsetDateTime::now_utc());
        let (tx, _rx) = channel();

        handle_key(key(KeyCode::Char('q')), &mut app, &tx);
        assert!(app.running);
        assert_eq!(app.login.email.value, "q");

        handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
            &tx,
        );
        assert!(!app.running);
    }
}
