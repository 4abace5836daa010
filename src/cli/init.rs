//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use xpledger::config::{write_atomically, Config};

/// Default configuration content for xpledger init
pub const DEFAULT_CONFIG: &str = r#"# xpledger configuration
# =====================
#
# Both catalogs are read from CSV exports of shared sheets. Use the
# "publish to web as CSV" link of each sheet, or a local file path.

# ============================================================================
# REWARD CATALOG - which activity grants how much XP
# ============================================================================
#
# One header row, then one row per activity:
#   row number | title | Socials | Knowledge | Game Making | Socializing
# XP cells may carry a suffix ("120 XP").

[reward_catalog]
csv_url = ""
# Minutes between refreshes (minimum 1)
auto_refresh_minutes = 15

# ============================================================================
# LEVEL CATALOG - how much total XP each level needs
# ============================================================================
#
# Three columns per category (level, unused, total XP) in the order
# Socials, Knowledge, Game Making, Socializing, Helping.

[level_catalog]
csv_url = ""
auto_refresh_minutes = 15

# ============================================================================
# LEDGER
# ============================================================================
#
# Uncomment to keep the ledger somewhere other than ~/.xpledger/ledger.json

[ledger]
# path = "/var/lib/xpledger/ledger.json"
"#;

/// Initialize a new xpledger configuration.
/// By default creates the global config at ~/.xpledger/config.toml
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    write_atomically(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());
    println!("Fill in reward_catalog.csv_url and level_catalog.csv_url before running other commands.");

    Ok(())
}
