use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CERTUS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertusConfig {
    /// Base URL of the hosted backend, e.g. "https://xyz.supabase.co"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Public (anon) project key sent as `apikey` on every request
    #[serde(default)]
    pub anon_key: String,
    /// Log filter directive, overrides `RUST_LOG` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:54321".to_string()
}

impl Default for CertusConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            anon_key: String::new(),
            log_level: None,
        }
    }
}

pub fn root_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("certus"))
}

impl CertusConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(root_path()?.join("config.toml"))
    }

    /// Config file (optional) overridden by `CERTUS_*` environment variables.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path, config::Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load_from(path: &Path, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env.prefix_separator("_").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        settings
            .try_deserialize::<Self>()
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Settings needed to talk to the hosted backend.
    pub fn ensure_remote(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            anyhow::bail!("api_url is not set (config file or CERTUS_API_URL)");
        }
        if self.anon_key.trim().is_empty() {
            anyhow::bail!("anon_key is not set (config file or CERTUS_ANON_KEY)");
        }
        Ok(())
    }

    /// Write a default config file unless one exists. Returns whether it was written.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CertusConfig::load_from(&dir.path().join("config.toml"), env(&[])).unwrap();
        assert_eq!(cfg, CertusConfig::default());
        assert!(cfg.ensure_remote().is_err());
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://demo.supabase.co\"\nanon_key = \"anon\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let cfg = CertusConfig::load_from(&path, env(&[])).unwrap();
        assert_eq!(cfg.api_url, "https://demo.supabase.co");
        assert_eq!(cfg.anon_key, "anon");
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert!(cfg.ensure_remote().is_ok());
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"https://file.example\"\nanon_key = \"file\"\n").unwrap();

        let cfg = CertusConfig::load_from(
            &path,
            env(&[("CERTUS_ANON_KEY", "from-env"), ("CERTUS_API_URL", "https://env.example")]),
        )
        .unwrap();
        assert_eq!(cfg.api_url, "https://env.example");
        assert_eq!(cfg.anon_key, "from-env");
    }

    #[test]
    fn default_file_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(CertusConfig::write_default_if_missing(&path).unwrap());
        assert!(!CertusConfig::write_default_if_missing(&path).unwrap());

        let cfg = CertusConfig::load_from(&path, env(&[])).unwrap();
        assert_eq!(cfg.api_url, default_api_url());
    }
}
