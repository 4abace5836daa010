//! Grant results

use std::collections::BTreeMap;

use crate::catalog::{CatalogRow, ThresholdTable};
use crate::domain::{Category, CategoryState};

/// Before/after record for one category touched by a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDiff {
    pub before: u32,
    pub after: u32,
    pub gained: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl CategoryDiff {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// A level transition the role-sync side may want to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub category: Category,
    pub old_level: u32,
    pub new_level: u32,
}

/// Result of a catalog-row grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantOutcome {
    /// The row as applied (manual override included)
    pub row: CatalogRow,
    /// One entry per category that received XP
    pub diffs: BTreeMap<Category, CategoryDiff>,
}

impl GrantOutcome {
    pub fn level_ups(&self) -> impl Iterator<Item = LevelUp> + '_ {
        self.diffs
            .iter()
            .filter(|(_, d)| d.leveled_up())
            .map(|(category, d)| LevelUp {
                category: *category,
                old_level: d.level_before,
                new_level: d.level_after,
            })
    }

    pub fn total_gained(&self) -> u64 {
        self.diffs.values().map(|d| u64::from(d.gained)).sum()
    }
}

/// Add `amount` to one category and re-resolve its level
pub(crate) fn apply_xp(
    state: &mut CategoryState,
    category: Category,
    amount: u32,
    thresholds: &ThresholdTable,
) -> CategoryDiff {
    let before = state.xp;
    let level_before = state.level;

    state.xp = state.xp.saturating_add(amount);
    state.level = thresholds.level_for(category, state.xp);

    CategoryDiff {
        before,
        after: state.xp,
        gained: state.xp - before,
        level_before,
        level_after: state.level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_xp_reports_transition() {
        let table = ThresholdTable::default().with_tiers(Category::Knowledge, [(1, 100), (2, 250)]);
        let mut state = CategoryState::default();

        let diff = apply_xp(&mut state, Category::Knowledge, 120, &table);
        assert_eq!(
            diff,
            CategoryDiff {
                before: 0,
                after: 120,
                gained: 120,
                level_before: 0,
                level_after: 1,
            }
        );
        assert!(diff.leveled_up());

        let diff = apply_xp(&mut state, Category::Knowledge, 10, &table);
        assert!(!diff.leveled_up());
        assert_eq!(state, CategoryState { xp: 130, level: 1 });
    }

    #[test]
    fn apply_xp_saturates() {
        let table = ThresholdTable::default();
        let mut state = CategoryState {
            xp: u32::MAX - 5,
            level: 0,
        };
        let diff = apply_xp(&mut state, Category::Socials, 10, &table);
        assert_eq!(diff.after, u32::MAX);
        assert_eq!(diff.gained, 5);
    }

    #[test]
    fn level_ups_only_lists_changed_levels() {
        let outcome = GrantOutcome {
            row: CatalogRow::new(1, "Jam"),
            diffs: BTreeMap::from([
                (
                    Category::GameMaking,
                    CategoryDiff { before: 90, after: 110, gained: 20, level_before: 0, level_after: 1 },
                ),
                (
                    Category::Socials,
                    CategoryDiff { before: 0, after: 5, gained: 5, level_before: 0, level_after: 0 },
                ),
            ]),
        };
        let ups: Vec<_> = outcome.level_ups().collect();
        assert_eq!(
            ups,
            vec![LevelUp { category: Category::GameMaking, old_level: 0, new_level: 1 }]
        );
        assert_eq!(outcome.total_gained(), 25);
    }
}
