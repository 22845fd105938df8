use std::sync::Arc;

use certus_ledger::domain::AuthSession;
use tokio::task::JoinHandle;

use crate::app::{App, GatedAction};
use crate::domain::ports::{AuthProvider, TimeLedger};
use crate::domain::{ElapsedTicker, Route, SessionTracker, Transition};

use super::action_queue::{Action, ActionTx};

/// The auth and ledger implementations the client runs against.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthProvider>,
    pub ledger: Arc<dyn TimeLedger>,
}

/// Long-lived pieces the actions work on besides the view state.
pub(super) struct Context {
    pub auth: Arc<dyn AuthProvider>,
    pub ledger: Arc<dyn TimeLedger>,
    pub tracker: SessionTracker,
    pub ticker: Option<ElapsedTicker>,
    pub action_tx: ActionTx,
    init_task: Option<JoinHandle<()>>,
}

impl Context {
    pub fn new(backend: Backend, action_tx: ActionTx) -> Self {
        Self {
            tracker: SessionTracker::new(backend.ledger.clone()),
            auth: backend.auth,
            ledger: backend.ledger,
            ticker: None,
            action_tx,
            init_task: None,
        }
    }

    /// Stop the ticker and any pending tracker initialization.
    pub fn shutdown(&mut self) {
        self.ticker = None;
        if let Some(task) = self.init_task.take() {
            task.abort();
        }
    }

    /// Discard the current tracker, including results of requests it still has in
    /// flight, and start over with an empty one.
    fn replace_tracker(&mut self) {
        self.tracker.reset();
        self.tracker = SessionTracker::new(self.ledger.clone());
    }
}

pub(super) fn run_action(action: Action, app: &mut App, ctx: &mut Context) {
    match action {
        Action::SessionChanged(session) => handle_session_change(session, app, ctx),
        Action::SubmitLogin => submit_login(app, ctx),
        Action::LoginFinished(result) => {
            app.login.submitting = false;
            if let Err(message) = result {
                app.login.error = Some(message);
            }
        }
        Action::Confirmed(action @ (GatedAction::ClockIn | GatedAction::ClockOut)) => {
            spawn_clock_action(action, ctx);
        }
        Action::Confirmed(GatedAction::SignOut) => spawn_sign_out(ctx),
        Action::SessionRestored(session) => {
            if ctx.tracker.state().active() == Some(&session) {
                app.record_restored(&session);
            }
        }
        Action::ClockFinished(transition) => {
            app.record_transition(transition);
            if matches!(transition, Transition::ClockedOut { .. }) {
                let _ = ctx.action_tx.send(Action::LoadHistory);
            }
        }
        Action::LoadHistory => {
            app.is_loading = true;
            spawn_history_load(ctx);
        }
        Action::HistoryLoaded(entries) => {
            app.is_loading = false;
            app.set_history_entries(entries);
        }
    }
}

fn handle_session_change(session: Option<AuthSession>, app: &mut App, ctx: &mut Context) {
    let route = Route::for_session(session.as_ref());

    match session {
        Some(session) => {
            let same_user = app
                .user
                .as_ref()
                .is_some_and(|u| u.id == session.user.id);
            if same_user {
                // Token refresh; nothing to re-route.
                app.user = Some(session.user);
                return;
            }

            tracing::info!(user_id = %session.user.id, "session started");
            ctx.shutdown();
            ctx.replace_tracker();
            app.apply_route(route, Some(session.user.clone()));
            ctx.ticker = Some(ElapsedTicker::spawn(ctx.tracker.subscribe()));

            let tracker = ctx.tracker.clone();
            let user_id = session.user.id;
            let tx = ctx.action_tx.clone();
            ctx.init_task = Some(tokio::spawn(async move {
                if let Some(restored) = tracker.initialize(&user_id).await {
                    let _ = tx.send(Action::SessionRestored(restored));
                }
            }));
            let _ = ctx.action_tx.send(Action::LoadHistory);
        }
        None => {
            if app.user.is_some() {
                tracing::info!("session ended");
            }
            ctx.shutdown();
            ctx.replace_tracker();
            app.apply_route(route, None);
        }
    }
}

fn submit_login(app: &mut App, ctx: &Context) {
    if app.login.submitting {
        return;
    }
    app.login.submitting = true;
    app.login.error = None;

    let email = app.login.email.value.trim().to_string();
    let password = app.login.password.value.clone();
    let auth = ctx.auth.clone();
    let tx = ctx.action_tx.clone();

    tokio::spawn(async move {
        let result = auth
            .sign_in_with_password(&email, &password)
            .await
            .map_err(|e| {
                tracing::warn!("Sign-in failed: {}", e);
                e.to_string()
            });
        let _ = tx.send(Action::LoginFinished(result));
    });
}

/// Resolve the signed-in user, then run the clock action on the tracker. The
/// tracker's own guards reject double submissions.
fn spawn_clock_action(action: GatedAction, ctx: &Context) {
    let auth = ctx.auth.clone();
    let tracker = ctx.tracker.clone();
    let tx = ctx.action_tx.clone();

    tokio::spawn(async move {
        let user = match auth.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(?action, "clock action without a signed-in user");
                return;
            }
            Err(e) => {
                tracing::error!("Failed to resolve current user: {}", e);
                return;
            }
        };

        let transition = match action {
            GatedAction::ClockIn => tracker.clock_in(&user.id).await,
            _ => tracker.clock_out(&user.id).await,
        };
        let _ = tx.send(Action::ClockFinished(transition));
    });
}

fn spawn_sign_out(ctx: &Context) {
    let auth = ctx.auth.clone();
    tokio::spawn(async move {
        if let Err(e) = auth.sign_out().await {
            tracing::error!("Failed to sign out: {}", e);
        }
    });
}

fn spawn_history_load(ctx: &Context) {
    let auth = ctx.auth.clone();
    let ledger = ctx.ledger.clone();
    let tx = ctx.action_tx.clone();

    tokio::spawn(async move {
        let entries = match auth.current_user().await {
            Ok(Some(user)) => match ledger.query_all_entries(&user.id).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!("Failed to load history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!("Failed to resolve current user: {}", e);
                Vec::new()
            }
        };
        let _ = tx.send(Action::HistoryLoaded(entries));
    });
}
