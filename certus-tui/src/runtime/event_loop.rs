use crate::app::App;
use crate::domain::IDLE_DISPLAY;
use crate::ui;
use anyhow::Result;
use certus_ledger::SessionSubscription;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::action_queue::{channel, Action, ActionRx, ActionTx};
use super::actions::{run_action, Backend, Context};
use super::views::handle_key;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    backend: Backend,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let mut ctx = Context::new(backend, action_tx.clone());

    // Subscribed once for the lifetime of the UI.
    let auth_forwarder = spawn_auth_forwarder(ctx.auth.on_session_change(), action_tx);

    let result = drive(terminal, app, &mut ctx, &mut action_rx).await;

    auth_forwarder.abort();
    ctx.shutdown();
    result
}

fn spawn_auth_forwarder(
    mut subscription: SessionSubscription,
    action_tx: ActionTx,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(session) = subscription.next().await {
            if action_tx.send(Action::SessionChanged(session)).is_err() {
                break;
            }
        }
        subscription.unsubscribe();
    })
}

async fn drive(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &mut Context,
    action_rx: &mut ActionRx,
) -> Result<()> {
    loop {
        app.session_state = ctx.tracker.state();
        app.elapsed = ctx
            .ticker
            .as_ref()
            .map(|t| t.display())
            .unwrap_or_else(|| IDLE_DISPLAY.to_string());

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, app, &ctx.action_tx);
                }
            }
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, ctx);
        }

        if !app.running {
            break;
        }

        // Let spawned clock and history tasks make progress between frames.
        tokio::task::yield_now().await;
    }

    Ok(())
}
