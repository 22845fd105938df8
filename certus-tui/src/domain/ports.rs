//! Outbound ports: the hosted auth service and the `time_entries` ledger.

use async_trait::async_trait;
use certus_ledger::domain::{AuthUser, EntryId, NewTimeEntry, TimeEntry, UserId};
use certus_ledger::SessionSubscription;
use time::OffsetDateTime;

use super::TrackingError;

/// Contract the client relies on for identity.
#[async_trait]
pub trait AuthProvider: Send + Sync + 'static {
    /// Resolve the signed-in user. Called before every ledger mutation; the
    /// result is never cached.
    async fn current_user(&self) -> Result<Option<AuthUser>, TrackingError>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<(), TrackingError>;

    async fn sign_out(&self) -> Result<(), TrackingError>;

    /// Stream of session transitions, starting with the current session.
    fn on_session_change(&self) -> SessionSubscription;
}

/// Contract the client relies on for time entry storage.
#[async_trait]
pub trait TimeLedger: Send + Sync + 'static {
    async fn insert_entry(&self, entry: &NewTimeEntry) -> Result<EntryId, TrackingError>;

    /// Set `clock_out` on an entry. The updated row is not verified.
    async fn update_clock_out(
        &self,
        id: EntryId,
        clock_out: OffsetDateTime,
    ) -> Result<(), TrackingError>;

    async fn query_open_entry(&self, user_id: &UserId) -> Result<Option<TimeEntry>, TrackingError>;

    /// All of the user's entries, newest clock-in first.
    async fn query_all_entries(&self, user_id: &UserId) -> Result<Vec<TimeEntry>, TrackingError>;
}
