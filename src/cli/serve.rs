//! Serve command implementation

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Keep the catalogs fresh until Ctrl-C
pub async fn serve_command(config_path: Option<&Path>) -> Result<()> {
    let app = super::open_app(config_path)?;
    let scheduler = app.start_refresh();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down");
    scheduler.shutdown().await;
    Ok(())
}
