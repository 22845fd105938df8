use std::sync::Arc;

use async_trait::async_trait;
use certus_ledger::domain::{AuthUser, EntryId, NewTimeEntry, TimeEntry, UserId};
use certus_ledger::{AuthClient, AuthError, LedgerClient, SessionSubscription};
use time::OffsetDateTime;

use crate::domain::ports::{AuthProvider, TimeLedger};
use crate::domain::TrackingError;

/// Hosted auth service behind the [`AuthProvider`] port.
#[derive(Debug, Clone)]
pub struct RemoteAuth {
    client: Arc<AuthClient>,
}

impl RemoteAuth {
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }
}

fn auth_error(e: AuthError) -> TrackingError {
    TrackingError::auth(e.to_string())
}

#[async_trait]
impl AuthProvider for RemoteAuth {
    async fn current_user(&self) -> Result<Option<AuthUser>, TrackingError> {
        self.client.current_user().await.map_err(auth_error)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), TrackingError> {
        self.client
            .sign_in_with_password(email, password)
            .await
            .map(|_| ())
            .map_err(auth_error)
    }

    async fn sign_out(&self) -> Result<(), TrackingError> {
        self.client.sign_out().await.map_err(auth_error)
    }

    fn on_session_change(&self) -> SessionSubscription {
        self.client.on_session_change()
    }
}

/// The hosted `time_entries` table behind the [`TimeLedger`] port.
#[derive(Debug, Clone)]
pub struct RemoteLedger {
    client: LedgerClient,
}

impl RemoteLedger {
    pub fn new(client: LedgerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TimeLedger for RemoteLedger {
    async fn insert_entry(&self, entry: &NewTimeEntry) -> Result<EntryId, TrackingError> {
        self.client
            .insert_entry(entry)
            .await
            .map_err(|e| TrackingError::write(e.to_string()))
    }

    async fn update_clock_out(
        &self,
        id: EntryId,
        clock_out: OffsetDateTime,
    ) -> Result<(), TrackingError> {
        self.client
            .update_clock_out(id, clock_out)
            .await
            .map_err(|e| TrackingError::write(e.to_string()))
    }

    async fn query_open_entry(&self, user_id: &UserId) -> Result<Option<TimeEntry>, TrackingError> {
        self.client
            .fetch_open_entry(user_id)
            .await
            .map_err(|e| TrackingError::read(e.to_string()))
    }

    async fn query_all_entries(&self, user_id: &UserId) -> Result<Vec<TimeEntry>, TrackingError> {
        self.client
            .fetch_entries(user_id)
            .await
            .map_err(|e| TrackingError::read(e.to_string()))
    }
}
