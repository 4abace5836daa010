//! Wiring of stores, ledger and scheduler from a [`Config`]

use std::sync::Arc;

use tracing::info;

use crate::catalog::{source_for, CatalogStore, RefreshError, RefreshReport, ThresholdStore};
use crate::config::Config;
use crate::ledger::{Ledger, LedgerStore};
use crate::refresh::{refresh_once, RefreshScheduler};
use crate::shutdown::ShutdownListener;

/// Everything a running ledger needs, explicitly constructed
pub struct App {
    pub config: Config,
    pub catalog: Arc<CatalogStore>,
    pub thresholds: Arc<ThresholdStore>,
    pub ledger: Ledger,
}

impl App {
    /// Build stores from the configured sources and open the ledger.
    ///
    /// Nothing is fetched yet: both catalogs start empty.
    pub fn from_config(config: Config) -> Self {
        let catalog = Arc::new(CatalogStore::new(source_for(&config.reward_catalog.csv_url)));
        let thresholds = Arc::new(ThresholdStore::new(source_for(&config.level_catalog.csv_url)));
        Self::with_stores(config, catalog, thresholds)
    }

    pub fn with_stores(config: Config, catalog: Arc<CatalogStore>, thresholds: Arc<ThresholdStore>) -> Self {
        let ledger = Ledger::open(
            LedgerStore::new(config.ledger_path()),
            Arc::clone(&catalog),
            Arc::clone(&thresholds),
        );
        Self {
            config,
            catalog,
            thresholds,
            ledger,
        }
    }

    /// Refresh both catalogs concurrently, thresholds first in the result
    pub async fn refresh_all(
        &self,
        shutdown: &ShutdownListener,
    ) -> (Result<RefreshReport, RefreshError>, Result<RefreshReport, RefreshError>) {
        tokio::join!(
            refresh_once(&*self.thresholds, shutdown),
            refresh_once(&*self.catalog, shutdown),
        )
    }

    /// Start periodic refresh of both catalogs
    pub fn start_refresh(&self) -> RefreshScheduler {
        let mut scheduler = RefreshScheduler::new();
        scheduler.spawn(
            Arc::clone(&self.thresholds),
            self.config.level_catalog.refresh_interval(),
        );
        scheduler.spawn(
            Arc::clone(&self.catalog),
            self.config.reward_catalog.refresh_interval(),
        );
        info!(
            members = self.ledger.len(),
            ledger = %self.ledger.store_path().display(),
            "Ledger ready"
        );
        scheduler
    }
}
