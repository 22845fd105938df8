use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use certus_ledger::domain::{EntryId, NewTimeEntry, UserId};
use time::OffsetDateTime;
use tokio::sync::watch;

use super::ports::TimeLedger;

/// The open entry the client believes the user is clocked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSession {
    pub id: EntryId,
    pub clock_in: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NoSession,
    ClockingIn,
    Active(ActiveSession),
    ClockingOut(ActiveSession),
}

impl SessionState {
    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            SessionState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn can_clock_in(&self) -> bool {
        matches!(self, SessionState::NoSession)
    }

    pub fn can_clock_out(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::ClockingIn | SessionState::ClockingOut(_))
    }
}

/// Result of a clock action, reported back to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ClockedIn(ActiveSession),
    ClockedOut { id: EntryId, at: OffsetDateTime },
    /// Rejected by a guard: already in flight, already active, or nothing to close.
    Skipped,
    /// The ledger call failed; details are in the log.
    Failed,
    /// The ledger call finished after the tracker was reset and was not applied.
    Discarded,
}

/// Holds the clock in/out state machine and publishes every state change.
///
/// Cloning is cheap and every clone shares the same state, so a clock action can
/// run on a spawned task while the UI keeps observing. A [`reset`](Self::reset)
/// starts a new generation; ledger results from an older generation are dropped.
#[derive(Clone)]
pub struct SessionTracker {
    ledger: Arc<dyn TimeLedger>,
    state: Arc<watch::Sender<SessionState>>,
    /// Bumped by `reset` while holding the watch lock.
    generation: Arc<AtomicU64>,
    now: fn() -> OffsetDateTime,
}

impl SessionTracker {
    pub fn new(ledger: Arc<dyn TimeLedger>) -> Self {
        let (state, _) = watch::channel(SessionState::NoSession);
        Self {
            ledger,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            now: OffsetDateTime::now_utc,
        }
    }

    pub fn with_clock(mut self, now: fn() -> OffsetDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Forget local state, e.g. after sign-out. Requests still in flight keep
    /// running but their results are discarded.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::NoSession;
        });
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Apply `update` only if no reset happened since `generation` was taken.
    fn apply_if_current(
        &self,
        generation: u64,
        update: impl FnOnce(&mut SessionState) -> bool,
    ) -> bool {
        self.state.send_if_modified(|state| {
            self.current_generation() == generation && update(state)
        })
    }

    /// Pick up an entry left open by an earlier run and return it. Query failures
    /// are logged only.
    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self, user_id: &UserId) -> Option<ActiveSession> {
        let generation = self.current_generation();

        let open = match self.ledger.query_open_entry(user_id).await {
            Ok(open) => open?,
            Err(e) => {
                tracing::error!("Failed to look up open time entry: {}", e);
                return None;
            }
        };

        let session = ActiveSession {
            id: open.id,
            clock_in: open.clock_in,
        };
        let restored = self.apply_if_current(generation, |state| {
            if *state == SessionState::NoSession {
                *state = SessionState::Active(session);
                true
            } else {
                false
            }
        });
        if !restored {
            return None;
        }

        tracing::info!(entry_id = %session.id, "restored open time entry");
        Some(session)
    }

    #[tracing::instrument(skip(self))]
    pub async fn clock_in(&self, user_id: &UserId) -> Transition {
        let mut generation = None;
        self.state.send_if_modified(|state| {
            if state.can_clock_in() {
                *state = SessionState::ClockingIn;
                generation = Some(self.current_generation());
                true
            } else {
                false
            }
        });
        let Some(generation) = generation else {
            tracing::debug!(state = ?self.state(), "clock-in ignored");
            return Transition::Skipped;
        };

        let clock_in = (self.now)();
        let entry = NewTimeEntry::new(user_id.clone(), clock_in);

        match self.ledger.insert_entry(&entry).await {
            Ok(id) => {
                let session = ActiveSession { id, clock_in };
                let applied = self.apply_if_current(generation, |state| {
                    *state = SessionState::Active(session);
                    true
                });
                if !applied {
                    tracing::warn!(
                        entry_id = %id,
                        "clock-in finished after reset, entry left open"
                    );
                    return Transition::Discarded;
                }
                tracing::info!(entry_id = %id, "clocked in");
                Transition::ClockedIn(session)
            }
            Err(e) => {
                self.apply_if_current(generation, |state| {
                    *state = SessionState::NoSession;
                    true
                });
                tracing::error!("Failed to clock in: {}", e);
                Transition::Failed
            }
        }
    }

    /// Close the active entry. The local session is cleared even when the ledger
    /// update fails; the next `initialize` reconciles with the ledger.
    #[tracing::instrument(skip(self))]
    pub async fn clock_out(&self, user_id: &UserId) -> Transition {
        let mut closing = None;
        self.state.send_if_modified(|state| match state {
            SessionState::Active(session) => {
                let session = *session;
                *state = SessionState::ClockingOut(session);
                closing = Some((session, self.current_generation()));
                true
            }
            _ => false,
        });
        let Some((session, generation)) = closing else {
            tracing::debug!(state = ?self.state(), "clock-out ignored");
            return Transition::Skipped;
        };

        let clock_out = (self.now)();
        let result = self.ledger.update_clock_out(session.id, clock_out).await;
        let applied = self.apply_if_current(generation, |state| {
            *state = SessionState::NoSession;
            true
        });

        match result {
            Ok(()) if !applied => {
                tracing::info!(entry_id = %session.id, "clocked out after reset");
                Transition::Discarded
            }
            Ok(()) => {
                tracing::info!(entry_id = %session.id, "clocked out");
                Transition::ClockedOut {
                    id: session.id,
                    at: clock_out,
                }
            }
            Err(e) => {
                tracing::error!(
                    entry_id = %session.id,
                    "Failed to clock out, entry may still be open in the ledger: {}",
                    e
                );
                Transition::Failed
            }
        }
    }
}
