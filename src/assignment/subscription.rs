//! Member subscriptions as handed to the assignor by the group coordinator
//!
//! A subscription carries the topics a member wants plus the opaque
//! `user_data` the member attached before the round. For this assignor the
//! user data is the member's encoded eligible-leader list (see `metadata`).

use super::metadata::EligibleLeaders;

/// Consumer subscription for one rebalance round
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberSubscription {
    /// Topics the member wants partitions from
    pub topics: Vec<String>,

    /// Assignor-specific user data (passed through unchanged by the coordinator)
    pub user_data: Option<Vec<u8>>,
}

impl MemberSubscription {
    /// Create a new subscription with the given topics and no user data
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            user_data: None,
        }
    }

    /// Attach user data to this subscription
    pub fn with_user_data(mut self, user_data: Vec<u8>) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// Whether this member subscribes to `topic`
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// Leader addresses this member advertised
    ///
    /// Missing or malformed user data yields an empty set.
    pub fn eligible_leaders(&self) -> EligibleLeaders {
        match &self.user_data {
            Some(data) => EligibleLeaders::decode(data),
            None => EligibleLeaders::default(),
        }
    }
}
