use certus_ledger::domain::{AuthSession, TimeEntry};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::GatedAction;
use crate::domain::{ActiveSession, Transition};

#[derive(Debug, Clone)]
pub(super) enum Action {
    /// Pushed by the auth subscription; routes between login and tabs.
    SessionChanged(Option<AuthSession>),
    SubmitLogin,
    LoginFinished(Result<(), String>),
    /// The user confirmed a gated action.
    Confirmed(GatedAction),
    ClockFinished(Transition),
    /// The tracker picked up an entry that was still open in the ledger.
    SessionRestored(ActiveSession),
    LoadHistory,
    HistoryLoaded(Vec<TimeEntry>),
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
