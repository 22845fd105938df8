use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use certus_ledger::domain::{AuthSession, AuthUser, EntryId, NewTimeEntry, TimeEntry, UserId};
use certus_ledger::SessionSubscription;
use time::{Duration, OffsetDateTime};
use tokio::sync::watch;

use crate::domain::ports::{AuthProvider, TimeLedger};
use crate::domain::TrackingError;

const DEV_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
const DEV_EMAIL: &str = "dev@certus.local";

/// In-memory auth and ledger for `certus dev`. Starts signed in with a few weeks
/// of closed entries.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
    session: Arc<watch::Sender<Option<AuthSession>>>,
}

#[derive(Debug)]
struct DevStore {
    entries: Vec<TimeEntry>,
    next_id: i64,
}

impl DevBackend {
    pub fn new() -> Self {
        let entries = seed_dev_history(OffsetDateTime::now_utc());
        let next_id = entries.len() as i64 + 1;
        let (session, _) = watch::channel(Some(dev_session(DEV_EMAIL)));
        Self {
            store: Arc::new(Mutex::new(DevStore { entries, next_id })),
            session: Arc::new(session),
        }
    }

    fn store(&self) -> Result<std::sync::MutexGuard<'_, DevStore>, TrackingError> {
        self.store
            .lock()
            .map_err(|_| TrackingError::read("dev store lock poisoned"))
    }
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn dev_session(email: &str) -> AuthSession {
    AuthSession {
        access_token: "dev-access-token".to_string(),
        refresh_token: "dev-refresh-token".to_string(),
        token_type: Some("bearer".to_string()),
        expires_at: None,
        user: AuthUser {
            id: UserId::new(DEV_USER_ID),
            email: Some(email.to_string()),
        },
    }
}

#[async_trait]
impl AuthProvider for DevBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, TrackingError> {
        Ok(self.session.borrow().as_ref().map(|s| s.user.clone()))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), TrackingError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(TrackingError::auth("Invalid login credentials"));
        }
        self.session.send_replace(Some(dev_session(email.trim())));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), TrackingError> {
        self.session.send_replace(None);
        Ok(())
    }

    fn on_session_change(&self) -> SessionSubscription {
        SessionSubscription::from_receiver(self.session.subscribe())
    }
}

#[async_trait]
impl TimeLedger for DevBackend {
    async fn insert_entry(&self, entry: &NewTimeEntry) -> Result<EntryId, TrackingError> {
        let mut store = self.store()?;
        let id = EntryId::new(store.next_id);
        store.next_id += 1;
        store
            .entries
            .push(TimeEntry::new(id, entry.user_id.clone(), entry.clock_in));
        Ok(id)
    }

    async fn update_clock_out(
        &self,
        id: EntryId,
        clock_out: OffsetDateTime,
    ) -> Result<(), TrackingError> {
        let mut store = self.store()?;
        if let Some(entry) = store.entries.iter_mut().find(|e| e.id == id) {
            entry.clock_out = Some(clock_out);
        }
        Ok(())
    }

    async fn query_open_entry(&self, user_id: &UserId) -> Result<Option<TimeEntry>, TrackingError> {
        Ok(self
            .store()?
            .entries
            .iter()
            .find(|e| &e.user_id == user_id && e.is_open())
            .cloned())
    }

    async fn query_all_entries(&self, user_id: &UserId) -> Result<Vec<TimeEntry>, TrackingError> {
        let mut entries: Vec<TimeEntry> = self
            .store()?
            .entries
            .iter()
            .filter(|e| &e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.clock_in.cmp(&a.clock_in));
        Ok(entries)
    }
}

/// Weekday shifts over the past 45 days, 08:00 to 16:30 UTC with some variation.
fn seed_dev_history(now: OffsetDateTime) -> Vec<TimeEntry> {
    let user = UserId::new(DEV_USER_ID);
    let today = now.date();

    (1..=45)
        .rev()
        .map(|days_ago| today - Duration::days(days_ago))
        .filter(|day| day.weekday().number_days_from_monday() < 5)
        .enumerate()
        .map(|(idx, day)| {
            let start = day.midnight().assume_utc() + Duration::hours(8)
                - Duration::minutes((idx % 3) as i64 * 10);
            let end = start + Duration::hours(8) + Duration::minutes((idx % 4) as i64 * 15);
            TimeEntry::new(idx as i64 + 1, user.clone(), start).with_clock_out(end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn user() -> UserId {
        UserId::new(DEV_USER_ID)
    }

    #[test]
    fn seeded_history_is_closed_weekdays() {
        let entries = seed_dev_history(datetime!(2024-03-15 12:00 UTC));
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| !e.is_open()));
        assert!(entries
            .iter()
            .all(|e| e.clock_in.weekday().number_days_from_monday() < 5));
    }

    #[tokio::test]
    async fn starts_signed_in() {
        let dev = DevBackend::new();
        let user = dev.current_user().await.unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some(DEV_EMAIL));

        let mut sub = dev.on_session_change();
        assert!(sub.next().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_password_is_rejected() {
        let dev = DevBackend::new();
        let err = dev
            .sign_in_with_password("ana@example.com", "")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn sign_out_then_in_notifies_subscribers() {
        let dev = DevBackend::new();
        let mut sub = dev.on_session_change();
        assert!(sub.next().await.unwrap().is_some());

        dev.sign_out().await.unwrap();
        assert_eq!(sub.next().await, Some(None));

        dev.sign_in_with_password("ana@example.com", "pw").await.unwrap();
        let session = sub.next().await.unwrap().unwrap();
        assert_eq!(session.user.email.as_deref(), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn clock_in_and_out_against_store() {
        let dev = DevBackend::new();
        assert!(dev.query_open_entry(&user()).await.unwrap().is_none());

        let id = dev
            .insert_entry(&NewTimeEntry::new(user(), OffsetDateTime::now_utc()))
            .await
            .unwrap();
        let open = dev.query_open_entry(&user()).await.unwrap().unwrap();
        assert_eq!(open.id, id);

        dev.update_clock_out(id, OffsetDateTime::now_utc())
            .await
            .unwrap();
        assert!(dev.query_open_entry(&user()).await.unwrap().is_none());

        let all = dev.query_all_entries(&user()).await.unwrap();
        assert_eq!(all[0].id, id);
    }
}
