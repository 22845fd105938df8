use super::LedgerFilter;

/// Matches entries that have been clocked in but not yet clocked out.
pub struct OpenEntryFilter;

impl LedgerFilter for OpenEntryFilter {
    fn as_ledger_filter(&self) -> String {
        "clock_out=is.null".to_string()
    }
}
