//! Configuration file I/O operations

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::Config;
use crate::atomic_file::replace_file;

impl Config {
    /// Get the global config directory path (~/.xpledger/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".xpledger")
    }

    /// Get the global config file path (~/.xpledger/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load and validate configuration from `path`, or the global path when None
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::global_config_path);

        if !path.exists() {
            bail!(
                "No configuration at {} (run `xpledger init` to create one)",
                path.display()
            );
        }

        let config = Self::from_file(&path)?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a file with atomic write and file locking
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        write_atomically(path, &content)
    }
}

/// Write `content` to `path` under an exclusive lock, via temp file + rename.
///
/// The parent directory is created if needed.
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    replace_file(path, content.as_bytes())
        .with_context(|| format!("Failed to save config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("config.toml");

        let mut config = Config::default();
        config.reward_catalog.csv_url = "https://example.com/r.csv".to_string();
        config.level_catalog.csv_url = "levels.csv".to_string();
        config.level_catalog.auto_refresh_minutes = 3;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn load_reports_missing_and_invalid_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(Config::load(Some(&missing)).is_err());

        let incomplete = dir.path().join("incomplete.toml");
        std::fs::write(&incomplete, "[reward_catalog]\ncsv_url = \"r.csv\"\n").unwrap();
        let err = Config::load(Some(&incomplete)).unwrap_err();
        assert!(format!("{:#}", err).contains("level_catalog.csv_url"));
    }
}
