//! Local token store: the last [`AuthSession`] as JSON, readable only by the user.

use anyhow::{Context, Result};
use certus_ledger::domain::AuthSession;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

use crate::config::root_path;

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

pub fn session_path() -> Result<PathBuf> {
    Ok(root_path()?.join("session"))
}

pub fn load_session() -> Result<Option<AuthSession>> {
    load_session_at(&session_path()?)
}

pub fn save_session(session: &AuthSession) -> Result<()> {
    save_session_at(&session_path()?, session)
}

pub fn clear_session() -> Result<()> {
    clear_session_at(&session_path()?)
}

/// A missing or empty file means "not logged in".
pub fn load_session_at(path: &Path) -> Result<Option<AuthSession>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).context("Failed to read session file")?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let session = serde_json::from_str(&raw).context("Failed to parse session file")?;
    Ok(Some(session))
}

pub fn save_session_at(path: &Path, session: &AuthSession) -> Result<()> {
    let raw = serde_json::to_string(session)?;
    secure_write(path, &raw)
}

pub fn clear_session_at(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
