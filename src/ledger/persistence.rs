//! Ledger file I/O
//!
//! The whole ledger lives in one pretty-printed JSON file. Writes go through a
//! temp file and a rename so a concurrent reader sees either the old file or
//! the new one, never a half-written one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::atomic_file::{replace_file, WriteStep};
use crate::domain::{Identity, UserState};

/// One member's persisted entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub community_id: u64,
    pub user_id: u64,
    pub state: UserState,
}

impl LedgerRecord {
    pub fn new(identity: Identity, state: UserState) -> Self {
        Self {
            community_id: identity.community_id,
            user_id: identity.user_id,
            state,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.community_id, self.user_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to read ledger file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse ledger file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write ledger file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to acquire ledger lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Durable home of the ledger
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing file is an empty ledger.
    pub fn load(&self) -> Result<Vec<LedgerRecord>, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| PersistenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file with `records` using lock + temp file + rename
    pub fn save(&self, records: &[LedgerRecord]) -> Result<(), PersistenceError> {
        let content = serde_json::to_string_pretty(records)?;
        replace_file(&self.path, content.as_bytes()).map_err(|e| match e.step {
            WriteStep::Lock => PersistenceError::Lock {
                path: e.path,
                source: e.error,
            },
            _ => PersistenceError::Write {
                path: e.path,
                source: e.error,
            },
        })
    }
}
