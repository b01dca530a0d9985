//! Partition Assignment Module
//!
//! Locality-aware assignment for consumer groups whose members process data
//! against a distributed store with a single write leader. Members close to
//! that leader get the partitions; the rest stay idle until leadership moves.
//!
//! # Architecture
//!
//! 1. Each member encodes its same-data-center leader addresses into its
//!    subscription user data (`metadata`)
//! 2. The elected group leader runs `LocalityAssignor::assign`
//! 3. The assignor filters members by the current write leader and delegates
//!    distribution to a fallback strategy (`strategies::range` by default)
//! 4. Every member receives an entry, possibly empty
//!
//! # Wire Format
//!
//! ```text
//! Locality user data (subscription user_data):
//!   eligible_leaders: [String]  // i32 count, then i16-length-prefixed UTF-8
//! ```

pub mod locality;
pub mod member_assignment;
pub mod metadata;
pub mod strategies;
pub mod subscription;


// Re-export main types
pub use locality::LocalityAssignor;
pub use member_assignment::{partitions_for, total_assigned, Assignment, TopicPartition};
pub use metadata::{
    decode_eligible_leaders, encode_eligible_leaders, try_decode_eligible_leaders,
    EligibleLeaders,
};
pub use strategies::{AssignmentInput, AssignmentOutput, AssignmentStrategy, RangeStrategy};
pub use subscription::MemberSubscription;
