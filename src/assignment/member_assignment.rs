//! Assignment results
//!
//! The assignor hands the coordinator one ordered partition list per member.
//! Members excluded by locality filtering still get an entry, just an empty one.

use std::collections::HashMap;
use std::fmt;

/// A single partition of a topic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.topic, self.partition)
    }
}

/// Map of member_id -> assigned partitions
pub type Assignment = HashMap<String, Vec<TopicPartition>>;

/// Partition ids of `topic` within one member's list, in assignment order
pub fn partitions_for(assigned: &[TopicPartition], topic: &str) -> Vec<i32> {
    assigned
        .iter()
        .filter(|tp| tp.topic == topic)
        .map(|tp| tp.partition)
        .collect()
}

/// Total number of partitions handed out across all members
pub fn total_assigned(assignment: &Assignment) -> usize {
    assignment.values().map(Vec::len).sum()
}
