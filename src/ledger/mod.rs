//! Per-member XP ledger
//!
//! The ledger maps every [`Identity`] to its [`UserState`] and persists the
//! whole map after each mutation.
//!
//! # Locking
//!
//! Each member's state sits behind its own mutex, so grants to one member
//! are serialized while grants to different members run in parallel. Saves
//! are serialized by a separate persistence gate; the snapshot written is
//! taken inside that gate, so a later save never writes older data than an
//! earlier one. No member lock is held while waiting for the gate.

mod grant;
mod persistence;
mod query;

pub use grant::{CategoryDiff, GrantOutcome, LevelUp};
pub use persistence::{LedgerRecord, LedgerStore, PersistenceError};
pub use query::Standing;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogStore, ThresholdStore};
use crate::domain::{Category, Identity, LogEntry, UserId, UserState};
use grant::apply_xp;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Row {0} not found in the catalog")]
    RowNotFound(u32),

    /// The in-memory ledger changed but the file on disk did not
    #[error("Ledger updated in memory but not saved: {0}")]
    PersistenceWriteFailed(#[source] PersistenceError),
}

type Slot = Arc<Mutex<UserState>>;

pub struct Ledger {
    users: DashMap<Identity, Slot>,
    catalog: Arc<CatalogStore>,
    thresholds: Arc<ThresholdStore>,
    store: LedgerStore,
    persist_gate: Mutex<()>,
}

impl Ledger {
    /// Open the ledger from `store`.
    ///
    /// An unreadable or corrupt file is logged and treated as an empty ledger.
    pub fn open(store: LedgerStore, catalog: Arc<CatalogStore>, thresholds: Arc<ThresholdStore>) -> Self {
        let users = DashMap::new();
        match store.load() {
            Ok(records) => {
                for record in records {
                    users.insert(record.identity(), Arc::new(Mutex::new(record.state)));
                }
                info!(members = users.len(), path = %store.path().display(), "Loaded ledger");
            }
            Err(e) => warn!("Starting with an empty ledger: {}", e),
        }

        Self {
            users,
            catalog,
            thresholds,
            store,
            persist_gate: Mutex::new(()),
        }
    }

    /// Grant the XP of one catalog row.
    ///
    /// `manual_xp` replaces the manual category's grant for this application only.
    pub fn grant_by_row(
        &self,
        identity: Identity,
        granted_by: UserId,
        row_number: u32,
        manual_xp: Option<u32>,
    ) -> Result<GrantOutcome, LedgerError> {
        let catalog = self.catalog.get();
        let row = catalog
            .row(row_number)
            .ok_or(LedgerError::RowNotFound(row_number))?
            .with_manual_override(manual_xp);
        let thresholds = self.thresholds.get();

        let slot = self.slot(identity);
        let diffs = {
            let mut state = lock(&slot);
            let diffs: BTreeMap<Category, CategoryDiff> = row
                .positive_grants()
                .map(|(category, amount)| {
                    let diff = apply_xp(state.category_mut(category), category, amount, &thresholds);
                    (category, diff)
                })
                .collect();

            state.logs.push(LogEntry {
                timestamp: Utc::now(),
                row_number: row.row_number,
                title: row.title.clone(),
                xp: diffs
                    .iter()
                    .filter(|(_, d)| d.gained > 0)
                    .map(|(category, d)| (*category, d.gained))
                    .collect(),
                granted_by,
            });
            diffs
        };

        debug!(%identity, row = row.row_number, granted_by, categories = diffs.len(), "Granted catalog row");
        self.persist()?;
        Ok(GrantOutcome { row, diffs })
    }

    /// Add XP to a single category without a log entry
    pub fn grant_direct(
        &self,
        identity: Identity,
        category: Category,
        amount: u32,
    ) -> Result<CategoryDiff, LedgerError> {
        let thresholds = self.thresholds.get();
        let slot = self.slot(identity);
        let diff = {
            let mut state = lock(&slot);
            apply_xp(state.category_mut(category), category, amount, &thresholds)
        };

        debug!(%identity, %category, amount, "Granted XP directly");
        self.persist()?;
        Ok(diff)
    }

    /// Current state of one member plus next-level requirements.
    ///
    /// Unlike the mutating operations, this does not create an entry for an
    /// unknown member: it returns an all-zero standing and leaves `len()` and
    /// `identities()` unchanged.
    pub fn query(&self, identity: Identity) -> Standing {
        let thresholds = self.thresholds.get();
        let slot = self.users.get(&identity).map(|entry| Arc::clone(entry.value()));
        let state = match slot {
            Some(slot) => {
                let state = lock(&slot).clone();
                state
            }
            None => UserState::default(),
        };
        Standing::new(identity, state, &thresholds)
    }

    /// Zero every category and clear the history of one member
    pub fn reset(&self, identity: Identity) -> Result<(), LedgerError> {
        lock(&self.slot(identity)).clear();
        info!(%identity, "Reset member");
        self.persist()
    }

    /// Sorted copy of every member's state
    pub fn records(&self) -> Vec<LedgerRecord> {
        let slots: Vec<(Identity, Slot)> = self
            .users
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut records: Vec<LedgerRecord> = slots
            .into_iter()
            .map(|(identity, slot)| LedgerRecord::new(identity, lock(&slot).clone()))
            .collect();
        records.sort_by_key(LedgerRecord::identity);
        records
    }

    pub fn identities(&self) -> Vec<Identity> {
        let mut ids: Vec<Identity> = self.users.iter().map(|entry| *entry.key()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Write the whole ledger
    pub fn persist(&self) -> Result<(), LedgerError> {
        let _gate = self.persist_gate.lock().unwrap_or_else(|e| e.into_inner());
        let records = self.records();
        self.store.save(&records).map_err(|e| {
            warn!("Failed to save ledger: {}", e);
            LedgerError::PersistenceWriteFailed(e)
        })
    }

    /// State slot for `identity`, created on first touch
    fn slot(&self, identity: Identity) -> Slot {
        Arc::clone(self.users.entry(identity).or_default().value())
    }
}

fn lock(slot: &Mutex<UserState>) -> MutexGuard<'_, UserState> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
