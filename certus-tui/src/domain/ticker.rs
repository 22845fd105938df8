use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::SessionState;

pub const IDLE_DISPLAY: &str = "00:00";

const TICK: Duration = Duration::from_secs(1);

/// Render an elapsed duration as `MM:SS`. Minutes are not capped.
pub fn format_elapsed(elapsed: time::Duration) -> String {
    let total = elapsed.whole_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn elapsed_display(state: &SessionState, now: OffsetDateTime) -> String {
    match state.active() {
        Some(session) => format_elapsed(now - session.clock_in),
        None => IDLE_DISPLAY.to_string(),
    }
}

/// Background 1 Hz task publishing the elapsed time of the active session.
/// The task stops when the ticker is dropped.
pub struct ElapsedTicker {
    display: watch::Receiver<String>,
    task: JoinHandle<()>,
}

impl ElapsedTicker {
    pub fn spawn(state: watch::Receiver<SessionState>) -> Self {
        Self::spawn_with_clock(state, OffsetDateTime::now_utc)
    }

    pub fn spawn_with_clock(
        state: watch::Receiver<SessionState>,
        now: fn() -> OffsetDateTime,
    ) -> Self {
        let initial = elapsed_display(&state.borrow(), now());
        let (tx, display) = watch::channel(initial);
        let task = tokio::spawn(run(state, tx, now));
        Self { display, task }
    }

    pub fn display(&self) -> String {
        self.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.clone()
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut state: watch::Receiver<SessionState>,
    display: watch::Sender<String>,
    now: fn() -> OffsetDateTime,
) {
    let mut interval = tokio::time::interval(TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let current = *state.borrow_and_update();
        let next = elapsed_display(&current, now());
        display.send_if_modified(|shown| {
            if *shown == next {
                return false;
            }
            *shown = next;
            true
        });

        tokio::select! {
            _ = interval.tick(), if current.active().is_some() => {}
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;
    use crate::domain::ActiveSession;
    use certus_ledger::domain::EntryId;
    use time::macros::datetime;

    const ANCHOR: OffsetDateTime = datetime!(2024-03-04 08:00 UTC);

    static FAKE_SECONDS: AtomicI64 = AtomicI64::new(0);

    fn fake_now() -> OffsetDateTime {
        ANCHOR + time::Duration::seconds(FAKE_SECONDS.load(Ordering::SeqCst))
    }

    fn active() -> SessionState {
        SessionState::Active(ActiveSession {
            id: EntryId::new(1),
            clock_in: ANCHOR,
        })
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(time::Duration::seconds(125)), "02:05");
        assert_eq!(format_elapsed(time::Duration::seconds(0)), "00:00");
        assert_eq!(format_elapsed(time::Duration::seconds(59)), "00:59");
    }

    #[test]
    fn minutes_past_99_are_not_truncated() {
        assert_eq!(format_elapsed(time::Duration::seconds(100 * 60 + 7)), "100:07");
    }

    #[test]
    fn negative_elapsed_reads_as_zero() {
        assert_eq!(format_elapsed(time::Duration::seconds(-30)), IDLE_DISPLAY);
    }

    #[test]
    fn display_depends_on_state() {
        let now = ANCHOR + time::Duration::seconds(125);
        assert_eq!(elapsed_display(&active(), now), "02:05");
        assert_eq!(elapsed_display(&SessionState::NoSession, now), IDLE_DISPLAY);
        assert_eq!(elapsed_display(&SessionState::ClockingIn, now), IDLE_DISPLAY);

        let SessionState::Active(session) = active() else {
            unreachable!()
        };
        assert_eq!(
            elapsed_display(&SessionState::ClockingOut(session), now),
            IDLE_DISPLAY
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_follows_clock_and_state() {
        FAKE_SECONDS.store(125, Ordering::SeqCst);
        let (state_tx, state_rx) = watch::channel(active());
        let ticker = ElapsedTicker::spawn_with_clock(state_rx, fake_now);
        assert_eq!(ticker.display(), "02:05");

        let mut display = ticker.subscribe();
        FAKE_SECONDS.store(126, Ordering::SeqCst);
        tokio::time::advance(TICK).await;
        display.wait_for(|d| d == "02:06").await.unwrap();

        state_tx.send_replace(SessionState::NoSession);
        display.wait_for(|d| d == IDLE_DISPLAY).await.unwrap();
    }

    #[tokio::test]
    async fn dropping_ticker_stops_task() {
        let (_state_tx, state_rx) = watch::channel(SessionState::NoSession);
        let ticker = ElapsedTicker::spawn(state_rx);
        let mut display = ticker.subscribe();

        drop(ticker);
        // The sender lives in the task; an aborted task closes the channel.
        assert!(display.changed().await.is_err());
    }
}
