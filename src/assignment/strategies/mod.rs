//! Fallback distribution strategies
//!
//! The locality assignor decides *who* may receive partitions; a strategy
//! decides *how* partitions are spread across those members. Strategies are
//! injected into the assignor rather than inherited from, so any even,
//! deterministic distribution can back it. The range strategy is the default.

pub mod range;

use std::collections::HashMap;

use super::member_assignment::Assignment;
use super::subscription::MemberSubscription;
use crate::error::Result;

pub use range::RangeStrategy;

/// Input for partition assignment computation
#[derive(Debug, Clone, Default)]
pub struct AssignmentInput {
    /// Map of member_id -> subscription
    pub subscriptions: HashMap<String, MemberSubscription>,

    /// Available partitions per topic: topic_name -> partition_count
    pub topic_partitions: HashMap<String, i32>,
}

impl AssignmentInput {
    /// Create new assignment input
    pub fn new(
        subscriptions: HashMap<String, MemberSubscription>,
        topic_partitions: HashMap<String, i32>,
    ) -> Self {
        Self {
            subscriptions,
            topic_partitions,
        }
    }

    /// Get all unique topics that any member is subscribed to
    pub fn all_subscribed_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .subscriptions
            .values()
            .flat_map(|sub| sub.topics.iter().cloned())
            .collect();
        topics.sort();
        topics.dedup();
        topics
    }

    /// Get member IDs subscribed to a specific topic, sorted
    pub fn members_for_topic(&self, topic: &str) -> Vec<String> {
        let mut members: Vec<String> = self
            .subscriptions
            .iter()
            .filter(|(_, sub)| sub.is_subscribed(topic))
            .map(|(id, _)| id.clone())
            .collect();
        members.sort();
        members
    }

    /// Topics with partition counts, sorted by name
    pub fn sorted_topics(&self) -> Vec<(&str, i32)> {
        let mut topics: Vec<(&str, i32)> = self
            .topic_partitions
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        topics.sort_by(|a, b| a.0.cmp(b.0));
        topics
    }
}

/// Output of partition assignment computation
pub type AssignmentOutput = Assignment;

/// Trait for fallback distribution strategies
///
/// Implementations must be deterministic: the same input yields the same
/// output, since coordinators may rerun an assignment for unchanged inputs.
pub trait AssignmentStrategy: Send + Sync {
    /// Strategy name
    fn name(&self) -> &'static str;

    /// Compute partition assignments for every member in `input`
    ///
    /// Every member of `input.subscriptions` must appear in the output.
    fn assign(&self, input: &AssignmentInput) -> Result<AssignmentOutput>;
}
