use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Row identifier assigned by the ledger on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Auth user identifier (a UUID string issued by the auth service).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One clock-in/clock-out pair as stored in `time_entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: EntryId,
    pub user_id: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub clock_in: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub clock_out: Option<OffsetDateTime>,
}

impl TimeEntry {
    pub fn new(id: impl Into<EntryId>, user_id: UserId, clock_in: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            user_id,
            clock_in,
            clock_out: None,
        }
    }

    pub fn with_clock_out(mut self, clock_out: OffsetDateTime) -> Self {
        self.clock_out = Some(clock_out);
        self
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

/// Insert payload. The ledger assigns `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTimeEntry {
    pub user_id: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub clock_in: OffsetDateTime,
}

impl NewTimeEntry {
    pub fn new(user_id: UserId, clock_in: OffsetDateTime) -> Self {
        Self { user_id, clock_in }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockOutPatch {
    #[serde(with = "time::serde::rfc3339")]
    pub clock_out: OffsetDateTime,
}

/// The `select=id` projection returned by an insert.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InsertedRow {
    pub id: EntryId,
}
