use serde::{Deserialize, Serialize};

pub type CommunityId = u64;
pub type UserId = u64;

/// Ledger key: a member of one community
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub community_id: CommunityId,
    pub user_id: UserId,
}

impl Identity {
    pub fn new(community_id: CommunityId, user_id: UserId) -> Self {
        Self {
            community_id,
            user_id,
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.community_id, self.user_id)
    }
}
