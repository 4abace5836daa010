//! Refresh command implementation

use anyhow::{bail, Result};
use std::path::Path;

use xpledger::shutdown::ShutdownListener;

/// Fetch both catalogs once
pub async fn refresh_command(config_path: Option<&Path>) -> Result<()> {
    let app = super::open_app(config_path)?;
    let (levels, rewards) = app.refresh_all(&ShutdownListener::never()).await;

    let mut failed = 0;
    for (source, result) in [
        (app.thresholds.describe_source(), levels),
        (app.catalog.describe_source(), rewards),
    ] {
        match result {
            Ok(report) => println!("{}: {} entries from {}", report.kind, report.admitted, source),
            Err(e) => {
                println!("{}: {}", source, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of 2 catalogs could not be refreshed", failed);
    }

    let catalog = app.catalog.get();
    println!("\nRows ({}):", catalog.len());
    for row in catalog.rows() {
        let grants: Vec<String> = row
            .positive_grants()
            .map(|(category, xp)| format!("{}:{}", category.short_code(), xp))
            .collect();
        println!("  #{:<4} {} [{}]", row.row_number, row.title, grants.join(", "));
    }

    Ok(())
}
