//! Configuration loading and management

mod io;
mod settings;

pub use io::write_atomically;
pub use settings::{LedgerSettings, SheetSettings, MIN_REFRESH_MINUTES};

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Sheet mapping activity rows to per-category XP
    #[serde(default)]
    pub reward_catalog: SheetSettings,

    /// Sheet mapping XP totals to levels per category
    #[serde(default)]
    pub level_catalog: SheetSettings,

    /// Ledger storage
    #[serde(default)]
    pub ledger: LedgerSettings,
}

impl Config {
    /// Check the options that have no usable default
    pub fn validate(&self) -> Result<()> {
        if !self.reward_catalog.is_configured() {
            bail!("Missing reward_catalog.csv_url in configuration");
        }
        if !self.level_catalog.is_configured() {
            bail!("Missing level_catalog.csv_url in configuration");
        }
        Ok(())
    }

    /// Ledger file path, falling back to ~/.xpledger/ledger.json
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger
            .path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("ledger.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
[reward_catalog]
csv_url = "https://example.com/rewards.csv"
auto_refresh_minutes = 5

[level_catalog]
csv_url = "levels.csv"

[ledger]
path = "/var/lib/xpledger/ledger.json"
"#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.reward_catalog.refresh_interval(), Duration::from_secs(300));
        assert_eq!(config.level_catalog.auto_refresh_minutes, 15);
        assert_eq!(config.ledger_path(), PathBuf::from("/var/lib/xpledger/ledger.json"));
    }

    #[test]
    fn missing_urls_fail_validation() {
        let config: Config = toml::from_str("[reward_catalog]\ncsv_url = \"a.csv\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("level_catalog.csv_url"));

        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn ledger_path_defaults_to_config_dir() {
        let config = Config::default();
        assert_eq!(config.ledger_path(), Config::global_config_dir().join("ledger.json"));
    }
}
