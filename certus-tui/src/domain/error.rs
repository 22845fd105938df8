use thiserror::Error;

/// Errors surfaced by the auth provider and the time ledger ports.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Carries the provider's own message; shown as-is on the login screen.
    #[error("{0}")]
    Auth(String),
    #[error("ledger write failed: {0}")]
    LedgerWrite(String),
    #[error("ledger read failed: {0}")]
    LedgerRead(String),
}

impl TrackingError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::LedgerWrite(msg.into())
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self::LedgerRead(msg.into())
    }
}
