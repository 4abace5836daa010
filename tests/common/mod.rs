//! Shared test utilities for ledger integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use xpledger::config::Config;

/// Reward sheet as exported: header, repeated header, a row "0" and real rows
pub const REWARDS_CSV: &str = "\
Číslo,Název,Socials,Knowledge,Game Making,Socializing
0,Název,Socials,Knowledge,Game Making,Socializing
1,\"Lecture, long\",,120 XP,,
2,Stream,10,0,,4XP
3,Small talk,,,,3
";

/// Level sheet: (level, unused, total XP) per category
pub const LEVELS_CSV: &str = "\
Lvl,,SOC,Lvl,,EDU,Lvl,,GMK,Lvl,,SLZ,Lvl,,HLP
1,,50,1,,100,1,,100,1,,10,1,,20
2,,150,2,,250,2,,300,2,,30,2,,60
";

/// Creates a temp dir holding both sheets and a config pointing at them
pub fn create_test_setup() -> (TempDir, Config) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_sheet(temp_dir.path(), "rewards.csv", REWARDS_CSV);
    write_sheet(temp_dir.path(), "levels.csv", LEVELS_CSV);

    let mut config = Config::default();
    config.reward_catalog.csv_url = temp_dir.path().join("rewards.csv").display().to_string();
    config.level_catalog.csv_url = format!("file://{}", temp_dir.path().join("levels.csv").display());
    config.ledger.path = Some(temp_dir.path().join("data").join("ledger.json"));

    (temp_dir, config)
}

pub fn write_sheet(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write sheet");
}
