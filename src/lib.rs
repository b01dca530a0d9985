//! Locality-aware partition assignment for consumer groups
//!
//! Consumers that write to a distributed store with a single write leader do
//! best when they run in the leader's data center. This crate provides a
//! group assignor that, on every rebalance, gives partitions only to members
//! co-located with the store's current write leader, plus the private wire
//! format members use to advertise their locality.
//!
//! - `assignment` - the assignor, the locality codec and the range fallback
//! - `discovery` - write-leader discovery contract and implementations
//! - `config` - assignor settings read from consumer properties

pub mod assignment;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;

// Test utilities (only compiled in test builds)
#[cfg(test)]
pub mod testing;

pub use assignment::{
    decode_eligible_leaders, encode_eligible_leaders, Assignment, LocalityAssignor,
    MemberSubscription, TopicPartition,
};
pub use config::AssignorConfig;
pub use discovery::LeaderDiscovery;
pub use error::{AssignorError, Result};
