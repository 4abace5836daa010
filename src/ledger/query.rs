use std::collections::BTreeMap;

use crate::catalog::ThresholdTable;
use crate::domain::{Category, Identity, UserState};

/// Read-only view of one member with the XP needed for each next level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub identity: Identity,
    pub state: UserState,
    /// None when the category is already at its highest defined level
    pub next_thresholds: BTreeMap<Category, Option<u32>>,
}

impl Standing {
    /// Levels are resolved again against `thresholds`, so a changed level
    /// sheet shows up without a new grant.
    pub(crate) fn new(identity: Identity, mut state: UserState, thresholds: &ThresholdTable) -> Self {
        let next_thresholds = Category::ALL
            .into_iter()
            .map(|category| {
                let current = state.category_mut(category);
                current.level = thresholds.level_for(category, current.xp);
                (category, thresholds.next_threshold(category, current.level))
            })
            .collect();

        Self {
            identity,
            state,
            next_thresholds,
        }
    }

    pub fn next_threshold(&self, category: Category) -> Option<u32> {
        self.next_thresholds.get(&category).copied().flatten()
    }

    pub fn is_max_level(&self, category: Category) -> bool {
        self.next_threshold(category).is_none()
    }

    /// XP still missing for the next level
    pub fn xp_to_next(&self, category: Category) -> Option<u32> {
        let next = self.next_threshold(category)?;
        Some(next.saturating_sub(self.state.category(category).xp))
    }
}
