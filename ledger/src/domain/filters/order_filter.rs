use super::LedgerFilter;

pub struct OrderFilter {
    column: &'static str,
    descending: bool,
}

impl OrderFilter {
    pub fn ascending(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn descending(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

impl LedgerFilter for OrderFilter {
    fn as_ledger_filter(&self) -> String {
        let direction = if self.descending { "desc" } else { "asc" };
        format!("order={}.{}", self.column, direction)
    }
}
