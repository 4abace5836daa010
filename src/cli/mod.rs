//! CLI command implementations

pub mod grant;
pub mod init;
pub mod member;
pub mod refresh;
pub mod serve;

use std::path::Path;

use anyhow::Result;

use xpledger::app::App;
use xpledger::config::Config;

/// Load the config and build the app without fetching anything
pub fn open_app(config_path: Option<&Path>) -> Result<App> {
    let config = Config::load(config_path)?;
    Ok(App::from_config(config))
}
