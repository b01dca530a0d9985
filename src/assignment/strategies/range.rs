//! Range Assignment Strategy
//!
//! For each topic independently:
//! 1. Sort subscribed members by member_id
//! 2. Enumerate partitions 0..partition_count
//! 3. Base range size = floor(num_partitions / num_members)
//! 4. The first `num_partitions % num_members` members get one extra partition
//!
//! With 7 partitions and 3 members: [0, 1, 2], [3, 4], [5, 6].
//!
//! Topics are visited in name order so each member's partition list comes out
//! in the same order on every run.

use tracing::trace;

use super::{AssignmentInput, AssignmentOutput, AssignmentStrategy};
use crate::assignment::member_assignment::TopicPartition;
use crate::error::{AssignorError, Result};

/// Range partition assignment strategy
#[derive(Debug, Clone, Default)]
pub struct RangeStrategy;

impl RangeStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl AssignmentStrategy for RangeStrategy {
    fn name(&self) -> &'static str {
        "range"
    }

    fn assign(&self, input: &AssignmentInput) -> Result<AssignmentOutput> {
        let mut result: AssignmentOutput = input
            .subscriptions
            .keys()
            .map(|member_id| (member_id.clone(), Vec::new()))
            .collect();

        for (topic, partition_count) in input.sorted_topics() {
            if partition_count < 0 {
                return Err(AssignorError::InvalidPartitionCount {
                    topic: topic.to_string(),
                    count: partition_count,
                });
            }

            let subscribed_members = input.members_for_topic(topic);
            if subscribed_members.is_empty() || partition_count == 0 {
                continue;
            }

            let num_members = subscribed_members.len() as i32;
            let base_range = partition_count / num_members;
            let extra_partitions = partition_count % num_members;

            let mut current_partition = 0;
            for (member_idx, member_id) in subscribed_members.iter().enumerate() {
                let range_size = base_range + i32::from((member_idx as i32) < extra_partitions);
                if range_size == 0 {
                    continue;
                }

                let range = current_partition..current_partition + range_size;
                current_partition += range_size;

                trace!(
                    "range: {} gets {}[{}..{})",
                    member_id,
                    topic,
                    range.start,
                    range.end
                );

                if let Some(assigned) = result.get_mut(member_id) {
                    assigned.extend(range.map(|p| TopicPartition::new(topic, p)));
                }
            }
        }

        Ok(result)
    }
}
