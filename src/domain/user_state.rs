use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, UserId};

/// XP and level in one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryState {
    pub xp: u32,
    pub level: u32,
}

/// One applied catalog grant, as it appears in a member's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the grant was applied
    pub timestamp: DateTime<Utc>,

    /// Catalog row the grant came from
    pub row_number: u32,

    /// Row title at the time of the grant
    pub title: String,

    /// Nonzero XP actually applied, per category
    pub xp: BTreeMap<Category, u32>,

    /// Who ran the grant
    pub granted_by: UserId,
}

impl LogEntry {
    /// Compact "SOC:10, EDU:5" rendering of the applied XP
    pub fn gained_summary(&self) -> String {
        self.xp
            .iter()
            .map(|(cat, xp)| format!("{}:{}", cat.short_code(), xp))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Everything the ledger knows about one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default = "all_categories")]
    pub categories: BTreeMap<Category, CategoryState>,

    /// Append-only, oldest first
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

fn all_categories() -> BTreeMap<Category, CategoryState> {
    Category::ALL
        .into_iter()
        .map(|c| (c, CategoryState::default()))
        .collect()
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            categories: all_categories(),
            logs: Vec::new(),
        }
    }
}

impl UserState {
    pub fn category(&self, category: Category) -> CategoryState {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    pub(crate) fn category_mut(&mut self, category: Category) -> &mut CategoryState {
        self.categories.entry(category).or_default()
    }

    /// Log entries, latest first
    pub fn recent_logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter().rev()
    }

    pub fn total_xp(&self) -> u64 {
        self.categories.values().map(|c| u64::from(c.xp)).sum()
    }

    /// Zero every category and drop the history
    pub(crate) fn clear(&mut self) {
        self.categories = all_categories();
        self.logs.clear();
    }
}
