//! Reward catalog: activity rows and the XP each one grants

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::store::Snapshot;
use crate::domain::Category;

/// Sheet column holding each category's grant. The manual category has no column.
const XP_COLUMNS: [(usize, Category); 4] = [
    (2, Category::Socials),
    (3, Category::Knowledge),
    (4, Category::GameMaking),
    (5, Category::Socializing),
];

/// Title cells that mark a repeated header line rather than an activity
const HEADER_LABELS: [&str; 2] = ["title", "name"];

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("leading integer pattern is valid"));

/// One activity from the reward sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    pub row_number: u32,
    pub title: String,
    /// XP granted per category; categories without a grant are absent or zero
    pub xp: BTreeMap<Category, u32>,
}

impl CatalogRow {
    pub fn new(row_number: u32, title: impl Into<String>) -> Self {
        Self {
            row_number,
            title: title.into(),
            xp: BTreeMap::new(),
        }
    }

    pub fn with_xp(mut self, category: Category, amount: u32) -> Self {
        self.xp.insert(category, amount);
        self
    }

    pub fn xp_for(&self, category: Category) -> u32 {
        self.xp.get(&category).copied().unwrap_or(0)
    }

    /// Copy of this row with the manual category's grant replaced
    pub fn with_manual_override(&self, manual_xp: Option<u32>) -> CatalogRow {
        let mut row = self.clone();
        if let Some(amount) = manual_xp {
            row.xp.insert(Category::MANUAL, amount);
        }
        row
    }

    /// Categories with a positive grant, in category order
    pub fn positive_grants(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        self.xp
            .iter()
            .filter(|(_, xp)| **xp > 0)
            .map(|(cat, xp)| (*cat, *xp))
    }
}

/// Published reward sheet, keyed by row number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardCatalog {
    rows: BTreeMap<u32, CatalogRow>,
}

impl RewardCatalog {
    /// Build from rows; for duplicate row numbers the first one wins
    pub fn from_rows(rows: impl IntoIterator<Item = CatalogRow>) -> Self {
        let mut by_number = BTreeMap::new();
        for row in rows {
            if by_number.contains_key(&row.row_number) {
                debug!(row = row.row_number, title = %row.title, "Dropping duplicate catalog row");
                continue;
            }
            by_number.insert(row.row_number, row);
        }
        Self { rows: by_number }
    }

    pub fn row(&self, row_number: u32) -> Option<&CatalogRow> {
        self.rows.get(&row_number)
    }

    /// Rows in ascending row-number order
    pub fn rows(&self) -> impl Iterator<Item = &CatalogRow> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Snapshot for RewardCatalog {
    const KIND: &'static str = "reward catalog";

    fn from_records(records: &[Vec<String>]) -> Self {
        Self::from_rows(records.iter().filter_map(|r| parse_row(r)))
    }

    fn admitted(&self) -> usize {
        self.len()
    }
}

/// Admit one sheet record, or drop it as junk
fn parse_row(record: &[String]) -> Option<CatalogRow> {
    let row_number = record.first()?.trim().parse::<u32>().ok().filter(|n| *n > 0)?;

    let title = record.get(1).map(|t| t.trim()).unwrap_or_default();
    if title.is_empty() || is_header_label(title) {
        return None;
    }

    let mut row = CatalogRow::new(row_number, title);
    for (column, category) in XP_COLUMNS {
        let amount = record.get(column).map(|c| parse_xp_cell(c)).unwrap_or(0);
        row.xp.insert(category, amount);
    }
    Some(row)
}

fn is_header_label(title: &str) -> bool {
    let lowered = title.to_lowercase();
    lowered.contains("název") || HEADER_LABELS.contains(&lowered.as_str())
}

/// Leading integer of an XP cell ("120", "120 XP", "50XP"), 0 when there is none
pub fn parse_xp_cell(cell: &str) -> u32 {
    LEADING_INT
        .captures(cell)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}
