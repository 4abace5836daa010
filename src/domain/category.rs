use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A scoring dimension. The set is closed and fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Socializing,
    Socials,
    Knowledge,
    GameMaking,
    Helping,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 5] = [
        Category::Socializing,
        Category::Socials,
        Category::Knowledge,
        Category::GameMaking,
        Category::Helping,
    ];

    /// The category that never comes from the reward sheet.
    ///
    /// It is only granted through a per-grant override or a direct grant.
    pub const MANUAL: Category = Category::Helping;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Socializing => "socializing",
            Self::Socials => "socials",
            Self::Knowledge => "knowledge",
            Self::GameMaking => "gamemaking",
            Self::Helping => "helping",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Socializing => "Socializing",
            Self::Socials => "Social Media",
            Self::Knowledge => "Knowledge",
            Self::GameMaking => "Game Making",
            Self::Helping => "Helping",
        }
    }

    /// Three-letter code used in compact log listings
    pub fn short_code(&self) -> &'static str {
        match self {
            Self::Socializing => "SLZ",
            Self::Socials => "SOC",
            Self::Knowledge => "EDU",
            Self::GameMaking => "GMK",
            Self::Helping => "HLP",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(wanted)
                    || c.short_code().eq_ignore_ascii_case(wanted)
                    || format!("{:?}", c).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
