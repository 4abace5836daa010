//! XP to level resolution
//!
//! Pure lookups over one category's tier list. Tier lists are published
//! sorted by `total_xp`, but nothing here depends on that order.

use serde::{Deserialize, Serialize};

/// One tier of a category's level table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub level: u32,
    /// Total XP needed to reach `level`
    pub total_xp: u32,
}

impl Threshold {
    pub fn new(level: u32, total_xp: u32) -> Self {
        Self { level, total_xp }
    }
}

/// Highest level whose requirement `xp` meets, or 0 when none does
pub fn level_for(tiers: &[Threshold], xp: u32) -> u32 {
    tiers
        .iter()
        .filter(|t| t.total_xp <= xp)
        .map(|t| t.level)
        .max()
        .unwrap_or(0)
}

/// XP needed for the level after `current_level` (None if max level)
pub fn next_threshold(tiers: &[Threshold], current_level: u32) -> Option<u32> {
    let wanted = current_level.checked_add(1)?;
    tiers
        .iter()
        .filter(|t| t.level == wanted)
        .map(|t| t.total_xp)
        .min()
}

/// Highest level defined by the table (0 when empty)
pub fn max_level(tiers: &[Threshold]) -> u32 {
    tiers.iter().map(|t| t.level).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> Vec<Threshold> {
        vec![
            Threshold::new(1, 100),
            Threshold::new(2, 250),
            Threshold::new(3, 500),
        ]
    }

    #[test]
    fn test_level_for_xp() {
        let tiers = tiers();
        assert_eq!(level_for(&tiers, 0), 0);
        assert_eq!(level_for(&tiers, 99), 0);
        assert_eq!(level_for(&tiers, 100), 1);
        assert_eq!(level_for(&tiers, 249), 1);
        assert_eq!(level_for(&tiers, 250), 2);
        assert_eq!(level_for(&tiers, 100_000), 3); // Beyond max
    }

    #[test]
    fn test_empty_table_is_level_zero() {
        assert_eq!(level_for(&[], 0), 0);
        assert_eq!(level_for(&[], u32::MAX), 0);
        assert_eq!(next_threshold(&[], 0), None);
    }

    #[test]
    fn test_level_is_monotonic_in_xp() {
        let tiers = vec![
            Threshold::new(1, 0),
            Threshold::new(2, 10),
            Threshold::new(3, 10),
            Threshold::new(4, 75),
            Threshold::new(5, 1_000),
        ];
        let mut previous = 0;
        for xp in (0..2_000).chain([u32::MAX - 1, u32::MAX]) {
            let level = level_for(&tiers, xp);
            assert!(level >= previous, "level dropped at xp {}", xp);
            previous = level;
        }
    }

    #[test]
    fn test_next_threshold() {
        let tiers = tiers();
        assert_eq!(next_threshold(&tiers, 0), Some(100));
        assert_eq!(next_threshold(&tiers, 1), Some(250));
        assert_eq!(next_threshold(&tiers, 3), None);
        assert_eq!(next_threshold(&tiers, u32::MAX), None);
        assert_eq!(max_level(&tiers), 3);
    }
}
