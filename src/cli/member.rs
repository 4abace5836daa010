//! Info, log and reset command implementations

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use xpledger::refresh::refresh_once;
use xpledger::shutdown::ShutdownListener;
use xpledger::{Category, Identity};

/// Show a member's categories and what the next level needs
pub async fn info_command(config_path: Option<&Path>, identity: Identity) -> Result<()> {
    let app = super::open_app(config_path)?;
    if let Err(e) = refresh_once(&*app.thresholds, &ShutdownListener::never()).await {
        warn!("Showing levels without the level catalog: {}", e);
    }

    let standing = app.ledger.query(identity);
    println!("Member {} ({} XP total)\n", identity, standing.state.total_xp());

    for category in Category::ALL {
        let current = standing.state.category(category);
        let next = match standing.xp_to_next(category) {
            Some(missing) => format!("{} XP to level {}", missing, current.level + 1),
            None => "max level".to_string(),
        };
        println!(
            "  {:<14} level {:<3} {:>6} XP  ({})",
            category.label(),
            current.level,
            current.xp,
            next
        );
    }

    Ok(())
}

/// Print the latest grants of a member
pub fn log_command(config_path: Option<&Path>, identity: Identity, limit: usize) -> Result<()> {
    let app = super::open_app(config_path)?;
    let standing = app.ledger.query(identity);

    if standing.state.logs.is_empty() {
        println!("No grants recorded for {}.", identity);
        return Ok(());
    }

    println!("Grants for {} ({}):\n", identity, standing.state.logs.len());
    for entry in standing.state.recent_logs().take(limit) {
        println!(
            "  {} #{:<4} {} [{}] by {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.row_number,
            entry.title,
            entry.gained_summary(),
            entry.granted_by
        );
    }

    Ok(())
}

/// Reset a member to zero
pub fn reset_command(config_path: Option<&Path>, identity: Identity) -> Result<()> {
    let app = super::open_app(config_path)?;
    app.ledger.reset(identity)?;
    println!("Reset {}", identity);
    Ok(())
}
