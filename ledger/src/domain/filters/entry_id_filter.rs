use crate::domain::EntryId;

use super::LedgerFilter;

pub struct EntryIdFilter {
    id: EntryId,
}

impl EntryIdFilter {
    pub fn new(id: EntryId) -> Self {
        Self { id }
    }
}

impl LedgerFilter for EntryIdFilter {
    fn as_ledger_filter(&self) -> String {
        format!("id=eq.{}", self.id)
    }
}
