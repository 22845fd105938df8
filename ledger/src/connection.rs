use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};

use crate::LedgerURL;

const APIKEY_HEADER: &str = "apikey";

/// Where the hosted backend lives and the public key every request must carry.
#[derive(Debug, Clone)]
pub struct Connection {
    url: LedgerURL,
    anon_key: String,
}

impl Connection {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: LedgerURL::new(url),
            anon_key: anon_key.into(),
        }
    }

    pub(crate) fn auth_url(&self, path: &str) -> LedgerURL {
        self.url.append_path("/auth/v1").append_path(path)
    }

    pub(crate) fn rest_url(&self, table: &str) -> LedgerURL {
        self.url.append_path("/rest/v1").append_path(table)
    }

    /// Headers shared by every call. `bearer` falls back to the anon key, which is
    /// what the auth endpoints expect before a user session exists.
    pub(crate) fn headers(&self, bearer: Option<&str>) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(APIKEY_HEADER, HeaderValue::from_str(&self.anon_key)?);
        let token = bearer.unwrap_or(&self.anon_key);
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        Ok(headers)
    }
}
