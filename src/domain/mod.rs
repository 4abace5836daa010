//! Core domain types for the XP ledger

mod category;
mod identity;
mod user_state;

pub use category::Category;
pub use identity::{CommunityId, Identity, UserId};
pub use user_state::{CategoryState, LogEntry, UserState};
