use crate::domain::LedgerFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerURL(String);

impl AsRef<str> for LedgerURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl LedgerURL {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_filter(&self, filter: &impl LedgerFilter) -> Self {
        self.with_query(&filter.as_ledger_filter())
    }

    pub fn with_param(&self, key: &str, value: &str) -> Self {
        self.with_query(&format!("{}={}", key, urlencoding::encode(value)))
    }

    fn with_query(&self, pair: &str) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{}", self.0, pair))
        } else {
            Self(format!("{}?{}", self.0, pair))
        }
    }
}
