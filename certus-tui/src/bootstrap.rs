//! Wires the hosted or in-memory backend together for the UI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use certus_ledger::{AuthClient, AuthError, Connection, LedgerClient, SessionSubscription};
use tokio::task::JoinHandle;

use crate::adapters::{DevBackend, RemoteAuth, RemoteLedger};
use crate::config::CertusConfig;
use crate::runtime::Backend;
use crate::session_store;

pub struct Services {
    pub backend: Backend,
    persistence: Option<JoinHandle<()>>,
}

impl Services {
    /// In-memory backend, already signed in. Nothing touches disk.
    pub fn dev() -> Self {
        let dev = DevBackend::new();
        Self {
            backend: Backend {
                auth: Arc::new(dev.clone()),
                ledger: Arc::new(dev),
            },
            persistence: None,
        }
    }

    /// Hosted backend, resuming the stored session when there is one.
    pub async fn remote(config: &CertusConfig) -> Result<Self> {
        config.ensure_remote()?;

        let stored = session_store::load_session().unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored session: {:#}", e);
            None
        });
        let auth = Arc::new(AuthClient::with_session(connection(config), stored));

        // Subscribe before restoring so a refreshed token is written back.
        let persistence =
            spawn_session_persistence(auth.on_session_change(), session_store::session_path()?);
        restore_session(&auth).await;

        let ledger = LedgerClient::new(auth.clone());
        Ok(Self {
            backend: Backend {
                auth: Arc::new(RemoteAuth::new(auth)),
                ledger: Arc::new(RemoteLedger::new(ledger)),
            },
            persistence: Some(persistence),
        })
    }
}

impl Drop for Services {
    fn drop(&mut self) {
        if let Some(task) = self.persistence.take() {
            task.abort();
        }
    }
}

pub fn connection(config: &CertusConfig) -> Connection {
    Connection::new(config.api_url.trim(), config.anon_key.trim())
}

/// Check the stored session against the server. The auth client renews an expired
/// or rejected token on its own; a session it cannot renew is dropped.
async fn restore_session(auth: &AuthClient) {
    if auth.session().is_none() {
        return;
    }

    match auth.current_user().await {
        Ok(Some(user)) => tracing::info!(user_id = %user.id, "stored session resumed"),
        Ok(None) => {}
        Err(e @ (AuthError::ResponseError(_) | AuthError::ParsingError(_))) => {
            // Offline or server trouble; keep the session and let the UI retry.
            tracing::warn!("Could not verify stored session: {}", e);
        }
        Err(e) => {
            tracing::warn!("Stored session is no longer valid: {}", e);
            auth.clear_session();
        }
    }
}

/// Mirror every session change to the token store at `path`.
fn spawn_session_persistence(
    mut subscription: SessionSubscription,
    path: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // The first value is the session we just loaded.
        if subscription.next().await.is_none() {
            return;
        }
        while let Some(session) = subscription.next().await {
            let result = match &session {
                Some(session) => session_store::save_session_at(&path, session),
                None => session_store::clear_session_at(&path),
            };
            if let Err(e) = result {
                tracing::error!("Failed to update stored session: {:#}", e);
            }
        }
    })
}

/// Sign out on the server (best effort) and remove the stored session.
pub async fn logout(config: &CertusConfig) -> Result<()> {
    let Some(session) = session_store::load_session()? else {
        println!("Not signed in.");
        return Ok(());
    };

    if config.ensure_remote().is_ok() {
        let auth = AuthClient::with_session(connection(config), Some(session));
        if let Err(e) = auth.sign_out().await {
            tracing::warn!("Server sign-out failed: {}", e);
        }
    }

    session_store::clear_session()?;
    println!("Signed out.");
    Ok(())
}
