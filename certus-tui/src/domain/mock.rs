//! In-memory ledger for testing.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use certus_ledger::domain::{EntryId, NewTimeEntry, TimeEntry, UserId};
use time::OffsetDateTime;
use tokio::sync::Semaphore;

use super::ports::TimeLedger;
use super::TrackingError;

/// Mock time ledger. Clones share state, so a test can keep a handle while the
/// tracker owns another and still flip failure modes or release held writes.
#[derive(Clone)]
pub struct MockLedger {
    entries: Arc<RwLock<Vec<TimeEntry>>>,
    next_id: Arc<AtomicI64>,
    inserts: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    /// When set, every write waits for a permit before touching the entries.
    gate: Arc<RwLock<Option<Arc<Semaphore>>>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            entries: Arc::default(),
            next_id: Arc::new(AtomicI64::new(1)),
            inserts: Arc::default(),
            updates: Arc::default(),
            fail_writes: Arc::default(),
            fail_reads: Arc::default(),
            gate: Arc::default(),
        }
    }
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(self, entries: Vec<TimeEntry>) -> Self {
        let max_id = entries.iter().map(|e| e.id.as_i64()).max().unwrap_or(0);
        self.next_id.store(max_id + 1, Ordering::SeqCst);
        *self.entries.write().unwrap() = entries;
        self
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    /// Hold writes until [`MockLedger::release`] hands out permits.
    pub fn held(self) -> Self {
        *self.gate.write().unwrap() = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self, writes: usize) {
        if let Some(gate) = self.gate.read().unwrap().as_ref() {
            gate.add_permits(writes);
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> Vec<TimeEntry> {
        self.entries.read().unwrap().clone()
    }

    async fn wait_for_gate(&self) {
        let gate = self.gate.read().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait]
impl TimeLedger for MockLedger {
    async fn insert_entry(&self, entry: &NewTimeEntry) -> Result<EntryId, TrackingError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrackingError::write("insert refused"));
        }

        let id = EntryId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.entries.write().unwrap().push(TimeEntry::new(
            id,
            entry.user_id.clone(),
            entry.clock_in,
        ));
        Ok(id)
    }

    async fn update_clock_out(
        &self,
        id: EntryId,
        clock_out: OffsetDateTime,
    ) -> Result<(), TrackingError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrackingError::write("update refused"));
        }

        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.clock_out = Some(clock_out);
        }
        Ok(())
    }

    async fn query_open_entry(&self, user_id: &UserId) -> Result<Option<TimeEntry>, TrackingError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TrackingError::read("query refused"));
        }
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .find(|e| &e.user_id == user_id && e.is_open())
            .cloned())
    }

    async fn query_all_entries(&self, user_id: &UserId) -> Result<Vec<TimeEntry>, TrackingError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TrackingError::read("query refused"));
        }
        let mut entries: Vec<TimeEntry> = self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| &e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.clock_in.cmp(&a.clock_in));
        Ok(entries)
    }
}
