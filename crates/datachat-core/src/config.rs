//! Configuration management for datachat.
//!
//! Loads configuration from ${DATACHAT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "DATACHAT_BASE_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for datachat configuration and logs.
    //!
    //! DATACHAT_HOME resolution order:
    //! 1. DATACHAT_HOME environment variable (if set)
    //! 2. ~/.config/datachat (default)
    //! 3. ./.datachat when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the datachat home directory.
    pub fn datachat_home() -> PathBuf {
        if let Ok(home) = std::env::var("DATACHAT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".datachat"),
            |h| h.join(".config").join("datachat"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        datachat_home().join("config.toml")
    }

    /// Returns the path to the log file.
    pub fn log_path() -> PathBuf {
        datachat_home().join("datachat.log")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the analysis backend
    pub base_url: String,

    /// Timeout for backend requests in seconds (0 disables)
    pub request_timeout_secs: u32,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://localhost:8080";
    /// Default is disabled
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 0;

    /// Loads configuration from the default config path, then applies
    /// the `DATACHAT_BASE_URL` override.
    ///
    /// # Errors
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&paths::config_path())?;
        Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Replaces `base_url` when an override is present and non-blank.
    #[must_use]
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or can't be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses a temp file + rename so a partial write never replaces the config.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "request_timeout_secs = 30\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "base_url = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_template_matches_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("base_url = \"http://localhost:8080\""));
        assert!(!dir.path().join("subdir").join("config.toml.tmp").exists());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_base_url_override() {
        let config = Config::default().with_base_url_override(Some(" http://x:1 ".into()));
        assert_eq!(config.base_url, "http://x:1");

        let config = Config::default().with_base_url_override(Some("   ".into()));
        assert_eq!(config.base_url, "http://localhost:8080");

        let config = Config::default().with_base_url_override(None);
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        assert_eq!(Config::default().request_timeout(), None);
    }
}
