use super::LedgerFilter;

pub struct LimitFilter(pub usize);

impl LedgerFilter for LimitFilter {
    fn as_ledger_filter(&self) -> String {
        format!("limit={}", self.0)
    }
}
