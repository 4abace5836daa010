//! Level catalog: per-category XP thresholds

use std::collections::BTreeMap;

use super::rewards::parse_xp_cell;
use super::store::Snapshot;
use crate::domain::Category;
use crate::levels::{self, Threshold};

/// First column of each category's (level, unused, total XP) column group
const COLUMN_GROUPS: [(usize, Category); 5] = [
    (0, Category::Socials),
    (3, Category::Knowledge),
    (6, Category::GameMaking),
    (9, Category::Socializing),
    (12, Category::Helping),
];

/// Published level sheet. Each category's tiers are sorted by `total_xp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdTable {
    tiers: BTreeMap<Category, Vec<Threshold>>,
}

impl ThresholdTable {
    /// Replace one category's tiers, sorting them by required XP
    pub fn with_tiers(mut self, category: Category, tiers: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut list: Vec<Threshold> = tiers
            .into_iter()
            .map(|(level, total_xp)| Threshold::new(level, total_xp))
            .collect();
        list.sort_by_key(|t| t.total_xp);
        self.tiers.insert(category, list);
        self
    }

    pub fn tiers(&self, category: Category) -> &[Threshold] {
        self.tiers.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Level reached in `category` with `xp`
    pub fn level_for(&self, category: Category, xp: u32) -> u32 {
        levels::level_for(self.tiers(category), xp)
    }

    /// XP needed for the level after `current_level`, None at the top
    pub fn next_threshold(&self, category: Category, current_level: u32) -> Option<u32> {
        levels::next_threshold(self.tiers(category), current_level)
    }

    pub fn max_level(&self, category: Category) -> u32 {
        levels::max_level(self.tiers(category))
    }

    /// Total tiers across all categories
    pub fn entry_count(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }
}

impl Snapshot for ThresholdTable {
    const KIND: &'static str = "level catalog";

    fn from_records(records: &[Vec<String>]) -> Self {
        let mut tiers: BTreeMap<Category, Vec<Threshold>> = BTreeMap::new();

        for record in records {
            for (start, category) in COLUMN_GROUPS {
                let Some(level) = parse_level(record.get(start)) else {
                    continue;
                };
                let total_xp = record.get(start + 2).map(|c| parse_xp_cell(c)).unwrap_or(0);
                tiers
                    .entry(category)
                    .or_default()
                    .push(Threshold::new(level, total_xp));
            }
        }

        for list in tiers.values_mut() {
            list.sort_by_key(|t| t.total_xp);
        }
        Self { tiers }
    }

    fn admitted(&self) -> usize {
        self.entry_count()
    }
}

/// Positive level number, anything else drops the entry
fn parse_level(cell: Option<&String>) -> Option<u32> {
    cell?.trim().parse::<u32>().ok().filter(|level| *level > 0)
}
