//! xpledger - community XP ledger
//!
//! Members of a community earn XP in a fixed set of categories by having
//! activities from a shared reward sheet granted to them. A second sheet maps
//! accumulated XP to levels. Both sheets are published as CSV and refreshed in
//! the background; the ledger itself is a local JSON file.
//!
//! ## Pieces
//!
//! 1. **Catalogs**: [`catalog::CatalogStore`] and [`catalog::ThresholdStore`]
//!    hold immutable snapshots that are swapped wholesale on refresh.
//!
//! 2. **Ledger**: [`ledger::Ledger`] applies grants under a per-member lock
//!    and saves the whole map after each change.

pub mod app;
mod atomic_file;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod levels;
pub mod refresh;
pub mod shutdown;

pub use domain::*;
