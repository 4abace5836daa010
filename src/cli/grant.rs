//! Grant and add command implementations

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

use xpledger::ledger::GrantOutcome;
use xpledger::shutdown::ShutdownListener;
use xpledger::{Category, Identity, UserId};

/// Grant one catalog row to a member
pub async fn grant_command(
    config_path: Option<&Path>,
    identity: Identity,
    row: u32,
    granted_by: UserId,
    helping: Option<u32>,
) -> Result<()> {
    let app = super::open_app(config_path)?;
    let (levels, rewards) = app.refresh_all(&ShutdownListener::never()).await;
    rewards.context("Reward catalog unavailable")?;
    if let Err(e) = levels {
        warn!("Levels will not be updated: {}", e);
    }

    let outcome = app
        .ledger
        .grant_by_row(identity, granted_by, row, helping)
        .with_context(|| format!("Failed to grant row {} to {}", row, identity))?;
    print_outcome(identity, &outcome);
    Ok(())
}

/// Add XP to one category of a member
pub async fn add_command(
    config_path: Option<&Path>,
    identity: Identity,
    category: Category,
    amount: u32,
) -> Result<()> {
    let app = super::open_app(config_path)?;
    if let Err(e) = xpledger::refresh::refresh_once(&*app.thresholds, &ShutdownListener::never()).await {
        warn!("Levels will not be updated: {}", e);
    }

    let diff = app.ledger.grant_direct(identity, category, amount)?;
    println!(
        "{} {}: {} -> {} XP (level {} -> {})",
        identity, category, diff.before, diff.after, diff.level_before, diff.level_after
    );
    Ok(())
}

fn print_outcome(identity: Identity, outcome: &GrantOutcome) {
    println!(
        "Granted #{} {} to {} ({} XP)",
        outcome.row.row_number,
        outcome.row.title,
        identity,
        outcome.total_gained()
    );
    for (category, diff) in &outcome.diffs {
        println!("  {:<14} +{:<5} {} -> {}", category.label(), diff.gained, diff.before, diff.after);
    }
    for level_up in outcome.level_ups() {
        println!(
            "  Level up in {}: {} -> {}",
            level_up.category, level_up.old_level, level_up.new_level
        );
    }
}
