//! Test helper functions
//!
//! Builders for subscriptions and discovery mocks, plus the structural checks
//! every assignment must pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::assignment::{encode_eligible_leaders, Assignment, MemberSubscription};
use crate::discovery::{LeaderDiscovery, MockLeaderDiscovery};

/// Subscription to `topics` advertising `leaders` as co-located
pub fn member(topics: &[&str], leaders: &[&str]) -> MemberSubscription {
    let leaders: Vec<String> = leaders.iter().map(|s| s.to_string()).collect();
    MemberSubscription::new(topics.iter().map(|s| s.to_string()).collect())
        .with_user_data(encode_eligible_leaders(&leaders).unwrap())
}

/// member_id -> subscription map from `(id, topics, leaders)` triples
pub fn subscriptions(
    members: &[(&str, &[&str], &[&str])],
) -> HashMap<String, MemberSubscription> {
    members
        .iter()
        .map(|(id, topics, leaders)| (id.to_string(), member(topics, leaders)))
        .collect()
}

/// Discovery that always reports `address` as the write leader
pub fn fixed_leader(address: Option<&'static str>) -> Arc<dyn LeaderDiscovery> {
    let mut mock = MockLeaderDiscovery::new();
    mock.expect_current_leader_address()
        .returning(move || Ok(address.map(String::from)));
    mock.expect_same_locality_addresses().returning(Vec::new);
    Arc::new(mock)
}

/// Every member has an entry, no partition is owned twice, and every
/// partition of every subscribed topic is owned
pub fn assert_valid_assignment(
    assignment: &Assignment,
    partitions_per_topic: &HashMap<String, i32>,
    subscriptions: &HashMap<String, MemberSubscription>,
) {
    assert_eq!(
        assignment.keys().collect::<HashSet<_>>(),
        subscriptions.keys().collect::<HashSet<_>>(),
        "assignment members differ from subscribed members"
    );

    let mut seen = HashSet::new();
    for (member_id, partitions) in assignment {
        for tp in partitions {
            assert!(seen.insert(tp.clone()), "{} assigned twice", tp);
            assert!(
                subscriptions[member_id].is_subscribed(&tp.topic),
                "{} assigned {} without subscribing",
                member_id,
                tp
            );
        }
    }

    let expected: usize = partitions_per_topic
        .iter()
        .filter(|(topic, _)| subscriptions.values().any(|s| s.is_subscribed(topic)))
        .map(|(_, count)| (*count).max(0) as usize)
        .sum();
    assert_eq!(seen.len(), expected, "not every subscribed partition is assigned");
}
