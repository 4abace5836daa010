//! Externally maintained catalogs
//!
//! Two sheets drive the ledger: the reward catalog (what each activity row
//! grants) and the level catalog (how much XP each level needs). Each is held
//! by its own [`SnapshotStore`] and refreshed independently.
//!
//! ```ignore
//! let catalog = Arc::new(CatalogStore::new(source_for(&config.reward_catalog.csv_url)));
//! catalog.refresh(&ShutdownListener::never()).await?;
//! let row = catalog.get().row(12).cloned();
//! ```

mod csv;
mod rewards;
mod source;
mod store;
mod thresholds;

pub use csv::{parse_records, CsvError};
pub use rewards::{parse_xp_cell, CatalogRow, RewardCatalog};
pub use source::{source_for, FileSource, HttpSource, StaticSource, TabularSource, DEFAULT_FETCH_TIMEOUT};
pub use store::{RefreshError, RefreshReport, Snapshot, SnapshotStore};
pub use thresholds::ThresholdTable;

/// Store for the reward catalog
pub type CatalogStore = SnapshotStore<RewardCatalog>;

/// Store for the level catalog
pub type ThresholdStore = SnapshotStore<ThresholdTable>;
