//! Settings configuration types

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Refreshes are never scheduled more often than this
pub const MIN_REFRESH_MINUTES: u64 = 1;

/// One externally maintained sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSettings {
    /// Published CSV export of the sheet (http(s) URL or local path)
    #[serde(default)]
    pub csv_url: String,

    /// Minutes between background refreshes (default: 15, minimum: 1)
    #[serde(default = "default_auto_refresh_minutes")]
    pub auto_refresh_minutes: u64,
}

fn default_auto_refresh_minutes() -> u64 {
    15
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            csv_url: String::new(),
            auto_refresh_minutes: default_auto_refresh_minutes(),
        }
    }
}

impl SheetSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.auto_refresh_minutes.max(MIN_REFRESH_MINUTES) * 60)
    }

    pub fn is_configured(&self) -> bool {
        !self.csv_url.trim().is_empty()
    }
}

/// Where the ledger file lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Ledger file path (defaults to ~/.xpledger/ledger.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_has_a_floor() {
        let mut sheet = SheetSettings::default();
        assert_eq!(sheet.refresh_interval(), Duration::from_secs(15 * 60));

        sheet.auto_refresh_minutes = 0;
        assert_eq!(sheet.refresh_interval(), Duration::from_secs(60));
    }
}
