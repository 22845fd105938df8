mod entry_id_filter;
mod limit_filter;
mod open_entry_filter;
mod order_filter;
mod user_filter;

pub use entry_id_filter::EntryIdFilter;
pub use limit_filter::LimitFilter;
pub use open_entry_filter::OpenEntryFilter;
pub use order_filter::OrderFilter;
pub use user_filter::UserFilter;

/// A single `key=value` pair understood by the row API's query string.
pub trait LedgerFilter {
    fn as_ledger_filter(&self) -> String;
}
