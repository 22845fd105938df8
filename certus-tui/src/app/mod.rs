use certus_ledger::domain::{AuthUser, TimeEntry};
use time::{OffsetDateTime, UtcOffset};

use crate::domain::{
    ActiveSession, ConfirmGate, HistoryFilter, Route, SessionState, Transition, IDLE_DISPLAY,
};

mod history;
mod state;
pub use state::{GatedAction, LoginField, LoginState, TextInput, View};

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub status_message: Option<String>,

    // Signed-in user, set by the auth router
    pub user: Option<AuthUser>,
    pub login: LoginState,

    // Mirrors of the tracker and ticker, refreshed every frame
    pub session_state: SessionState,
    pub elapsed: String,
    pub last_clock_in: Option<OffsetDateTime>,
    pub last_clock_out: Option<OffsetDateTime>,

    pub history: HistoryFilter,
    pub history_scroll: usize,
    pub history_view_height: usize, // Last-rendered inner height (updated by renderer each frame)

    pub confirm: ConfirmGate<GatedAction>,

    pub is_loading: bool,
    /// Offset used for month boundaries and displayed times.
    pub offset: UtcOffset,
}

impl App {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            running: true,
            current_view: View::Login,
            status_message: None,
            user: None,
            login: LoginState::default(),
            session_state: SessionState::NoSession,
            elapsed: IDLE_DISPLAY.to_string(),
            last_clock_in: None,
            last_clock_out: None,
            history: HistoryFilter::new(now),
            history_scroll: 0,
            history_view_height: 0,
            confirm: ConfirmGate::new(),
            is_loading: false,
            offset: now.offset(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn navigate_to(&mut self, view: View) {
        self.current_view = view;
    }

    /// Switch between the login screen and the tabs. Everything tied to the
    /// previous user is dropped.
    pub fn apply_route(&mut self, route: Route, user: Option<AuthUser>) {
        self.confirm.cancel();
        self.session_state = SessionState::NoSession;
        self.elapsed = IDLE_DISPLAY.to_string();
        self.last_clock_in = None;
        self.last_clock_out = None;
        self.history.set_entries(Vec::new());
        self.history_scroll = 0;
        self.clear_status();

        match route {
            Route::Tabs => {
                self.user = user;
                self.login = LoginState::default();
                self.current_view = View::Clock;
            }
            Route::Login => {
                self.user = None;
                self.login.password.clear();
                self.login.submitting = false;
                self.current_view = View::Login;
            }
        }
    }

    pub fn next_tab(&mut self) {
        self.cycle_tab(1);
    }

    pub fn prev_tab(&mut self) {
        self.cycle_tab(View::TABS.len() - 1);
    }

    fn cycle_tab(&mut self, step: usize) {
        if let Some(idx) = View::TABS.iter().position(|v| *v == self.current_view) {
            self.current_view = View::TABS[(idx + step) % View::TABS.len()];
        }
    }

    /// Open the confirmation prompt for an action, if the action is currently
    /// possible. Returns whether the prompt was opened.
    pub fn request(&mut self, action: GatedAction) -> bool {
        let allowed = match action {
            GatedAction::ClockIn => self.session_state.can_clock_in(),
            GatedAction::ClockOut => self.session_state.can_clock_out(),
            GatedAction::SignOut => self.user.is_some(),
        };
        if allowed {
            self.confirm.open(action.prompt());
        }
        allowed
    }

    /// Record the outcome of a clock action for the Clock view.
    pub fn record_transition(&mut self, transition: Transition) {
        match transition {
            Transition::ClockedIn(session) => {
                self.last_clock_in = Some(session.clock_in);
                self.set_status("Clocked in");
            }
            Transition::ClockedOut { at, .. } => {
                self.last_clock_out = Some(at);
                self.set_status("Clocked out");
            }
            Transition::Skipped | Transition::Failed | Transition::Discarded => {}
        }
    }

    /// An entry left open by an earlier run is being tracked again.
    pub fn record_restored(&mut self, session: &ActiveSession) {
        self.last_clock_in = Some(session.clock_in);
    }

    pub fn set_history_entries(&mut self, entries: Vec<TimeEntry>) {
        self.history.set_entries(entries);
        self.clamp_history_scroll();
    }

    pub fn signed_in_email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }
}
