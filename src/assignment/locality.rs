//! Locality-aware partition assignment
//!
//! On every rebalance the elected group leader runs this assignor. It asks
//! leader discovery where the store's write leader currently lives and hands
//! partitions only to members that advertised that leader as co-located.
//!
//! # Algorithm
//!
//! 1. Query the current write-leader address (errors abort the round)
//! 2. Candidate set = members whose eligible leaders contain that address,
//!    or every member when no leader is known
//! 3. Empty candidate set falls back to every member
//! 4. The fallback strategy distributes partitions over the candidates
//! 5. Topics that no candidate subscribes to are distributed over all of
//!    their subscribers, so no subscribed partition goes unowned
//! 6. Every member missing from the result gets an empty list
//!
//! Per-member metadata that fails to decode only excludes that member.
//! Discovery and strategy failures propagate; the coordinator retries the
//! rebalance rather than receiving a locality-unaware assignment.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::member_assignment::Assignment;
use super::metadata::encode_eligible_leaders;
use super::strategies::{AssignmentInput, AssignmentOutput, AssignmentStrategy, RangeStrategy};
use super::subscription::MemberSubscription;
use crate::config::AssignorConfig;
use crate::constants::REGIONAL_ASSIGNOR_NAME;
use crate::discovery::{DeadlineDiscovery, LeaderDiscovery};
use crate::error::Result;

/// Partition assignor restricted to members co-located with the write leader
pub struct LocalityAssignor {
    discovery: Arc<dyn LeaderDiscovery>,
    fallback: Box<dyn AssignmentStrategy>,
    log_timing: bool,
}

impl LocalityAssignor {
    /// Assignor using the range strategy for distribution
    pub fn new(discovery: Arc<dyn LeaderDiscovery>) -> Self {
        Self::with_strategy(discovery, Box::new(RangeStrategy::new()))
    }

    /// Assignor with a custom fallback distribution strategy
    pub fn with_strategy(
        discovery: Arc<dyn LeaderDiscovery>,
        fallback: Box<dyn AssignmentStrategy>,
    ) -> Self {
        Self {
            discovery,
            fallback,
            log_timing: false,
        }
    }

    /// Assignor whose leader queries are bounded by the configured deadline
    pub fn from_config(discovery: Arc<dyn LeaderDiscovery>, config: &AssignorConfig) -> Self {
        let bounded: Arc<dyn LeaderDiscovery> =
            Arc::new(DeadlineDiscovery::from_config(discovery, config));
        let mut assignor = Self::new(bounded);
        assignor.log_timing = config.log_timing;
        assignor
    }

    /// Protocol name advertised in JoinGroup
    pub fn name(&self) -> &'static str {
        REGIONAL_ASSIGNOR_NAME
    }

    /// Name of the strategy doing the actual distribution
    pub fn fallback_name(&self) -> &'static str {
        self.fallback.name()
    }

    /// Encoded eligible-leader list this member attaches to its subscription
    pub fn subscription_user_data(&self) -> Result<Vec<u8>> {
        let addresses = self.discovery.same_locality_addresses();
        debug!("Advertising {} same-locality leader addresses", addresses.len());
        encode_eligible_leaders(&addresses)
    }

    /// Complete subscription for this member
    pub fn subscription(&self, topics: Vec<String>) -> Result<MemberSubscription> {
        Ok(MemberSubscription::new(topics).with_user_data(self.subscription_user_data()?))
    }

    /// Compute the group assignment for one rebalance round
    ///
    /// # Arguments
    /// * `partitions_per_topic` - topic_name -> partition_count
    /// * `subscriptions` - member_id -> subscription
    ///
    /// # Returns
    /// One entry per member in `subscriptions`, possibly empty
    ///
    /// # Errors
    /// Leader-discovery and fallback-strategy failures.
    pub fn assign(
        &self,
        partitions_per_topic: &HashMap<String, i32>,
        subscriptions: &HashMap<String, MemberSubscription>,
    ) -> Result<Assignment> {
        let started = Instant::now();
        info!(
            "Running {} partition assignment: members={}, topics={}",
            self.name(),
            subscriptions.len(),
            partitions_per_topic.len()
        );

        let leader = self.discovery.current_leader_address().map_err(|e| {
            error!("Partition assignment aborted, leader discovery failed: {}", e);
            e
        })?;

        let candidates = Self::candidate_members(leader.as_deref(), subscriptions);
        let candidate_input = AssignmentInput::new(
            candidates
                .iter()
                .filter_map(|id| subscriptions.get(id).map(|sub| (id.clone(), sub.clone())))
                .collect(),
            partitions_per_topic.clone(),
        );

        let mut result = self.run_fallback(&candidate_input)?;

        let orphaned = orphaned_topics(&candidate_input, partitions_per_topic, subscriptions);
        if !orphaned.is_empty() {
            warn!(
                "No co-located member subscribes to {:?}; assigning those topics across all subscribers",
                orphaned.keys().collect::<Vec<_>>()
            );
            let rescue_input = AssignmentInput::new(subscriptions.clone(), orphaned);
            for (member_id, partitions) in self.run_fallback(&rescue_input)? {
                result.entry(member_id).or_default().extend(partitions);
            }
        }

        // Reconcile: excluded members still get an (empty) entry
        result.retain(|member_id, _| subscriptions.contains_key(member_id));
        for member_id in subscriptions.keys() {
            result.entry(member_id.clone()).or_default();
        }

        let elapsed_ms = started.elapsed().as_millis();
        if self.log_timing {
            info!(
                "Finished {} partition assignment in {} ms ({} of {} members eligible)",
                self.name(),
                elapsed_ms,
                candidates.len(),
                subscriptions.len()
            );
        } else {
            debug!("Finished partition assignment in {} ms", elapsed_ms);
        }

        Ok(result)
    }

    /// Members eligible for partitions given the current leader, sorted by id
    ///
    /// Falls back to every member when `leader` is `None` or nobody is
    /// co-located with it.
    pub fn candidate_members(
        leader: Option<&str>,
        subscriptions: &HashMap<String, MemberSubscription>,
    ) -> Vec<String> {
        let mut all: Vec<String> = subscriptions.keys().cloned().collect();
        all.sort();

        let Some(leader) = leader else {
            info!("No write leader found. Doing assignment on all members.");
            return all;
        };

        let restricted: Vec<String> = all
            .iter()
            .filter(|member_id| {
                let eligible = subscriptions[member_id.as_str()].eligible_leaders();
                let co_located = eligible.contains(leader);
                debug!(
                    "Member {} advertises {:?}, co-located with {}: {}",
                    member_id,
                    eligible.as_slice(),
                    leader,
                    co_located
                );
                co_located
            })
            .cloned()
            .collect();

        if restricted.is_empty() {
            info!(
                "No members in the same data center as leader {} found. Doing assignment on all members.",
                leader
            );
            return all;
        }

        restricted
    }

    fn run_fallback(&self, input: &AssignmentInput) -> Result<AssignmentOutput> {
        self.fallback.assign(input).map_err(|e| {
            error!(
                "Partition assignment aborted, {} strategy failed: {}",
                self.fallback.name(),
                e
            );
            e
        })
    }
}

/// Topics some member subscribes to but no candidate does
fn orphaned_topics(
    candidate_input: &AssignmentInput,
    partitions_per_topic: &HashMap<String, i32>,
    subscriptions: &HashMap<String, MemberSubscription>,
) -> HashMap<String, i32> {
    partitions_per_topic
        .iter()
        .filter(|(topic, count)| {
            **count > 0
                && candidate_input.members_for_topic(topic).is_empty()
                && subscriptions.values().any(|sub| sub.is_subscribed(topic))
        })
        .map(|(topic, count)| (topic.clone(), *count))
        .collect()
}

impl AssignmentStrategy for LocalityAssignor {
    fn name(&self) -> &'static str {
        REGIONAL_ASSIGNOR_NAME
    }

    fn assign(&self, input: &AssignmentInput) -> Result<AssignmentOutput> {
        LocalityAssignor::assign(self, &input.topic_partitions, &input.subscriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::member_assignment::{partitions_for, TopicPartition};
    use crate::discovery::MockLeaderDiscovery;
    use crate::error::AssignorError;

    fn member(topics: &[&str], leaders: &[&str]) -> MemberSubscription {
        let leaders: Vec<String> = leaders.iter().map(|s| s.to_string()).collect();
        MemberSubscription::new(topics.iter().map(|s| s.to_string()).collect())
            .with_user_data(encode_eligible_leaders(&leaders).unwrap())
    }

    fn leader_at(address: Option<&'static str>) -> Arc<dyn LeaderDiscovery> {
        let mut mock = MockLeaderDiscovery::new();
        mock.expect_current_leader_address()
            .returning(move || Ok(address.map(String::from)));
        Arc::new(mock)
    }

    fn one_topic(partitions: i32) -> HashMap<String, i32> {
        HashMap::from([("topic-a".to_string(), partitions)])
    }

    #[test]
    fn test_name() {
        let assignor = LocalityAssignor::new(leader_at(None));
        assert_eq!(assignor.name(), "regional-assignor");
        assert_eq!(assignor.fallback_name(), "range");
        assert_eq!(AssignmentStrategy::name(&assignor), "regional-assignor");
    }

    #[test]
    fn test_restricts_to_co_located_members() {
        let subscriptions = HashMap::from([
            ("m1".to_string(), member(&["topic-a"], &["a"])),
            ("m2".to_string(), member(&["topic-a"], &["b"])),
        ]);

        let assignor = LocalityAssignor::new(leader_at(Some("a")));
        let result = assignor.assign(&one_topic(2), &subscriptions).unwrap();

        assert_eq!(partitions_for(&result["m1"], "topic-a"), vec![0, 1]);
        assert!(result["m2"].is_empty());
    }

    #[test]
    fn test_no_leader_uses_all_members() {
        let subscriptions = HashMap::from([
            ("m1".to_string(), member(&["topic-a"], &["a"])),
            ("m2".to_string(), member(&["topic-a"], &["b"])),
        ]);

        let assignor = LocalityAssignor::new(leader_at(None));
        let result = assignor.assign(&one_topic(2), &subscriptions).unwrap();

        assert_eq!(result["m1"], vec![TopicPartition::new("topic-a", 0)]);
        assert_eq!(result["m2"], vec![TopicPartition::new("topic-a", 1)]);
    }

    #[test]
    fn test_nobody_co_located_falls_back_to_all() {
        let subscriptions = HashMap::from([
            ("m1".to_string(), member(&["topic-a"], &["b"])),
            ("m2".to_string(), member(&["topic-a"], &["c"])),
        ]);

        let assignor = LocalityAssignor::new(leader_at(Some("a")));
        let result = assignor.assign(&one_topic(2), &subscriptions).unwrap();

        assert_eq!(result["m1"], vec![TopicPartition::new("topic-a", 0)]);
        assert_eq!(result["m2"], vec![TopicPartition::new("topic-a", 1)]);
    }

    #[test]
    fn test_corrupt_metadata_excludes_only_that_member() {
        let subscriptions = HashMap::from([
            ("m1".to_string(), member(&["topic-a"], &["a"])),
            (
                "m2".to_string(),
                MemberSubscription::new(vec!["topic-a".to_string()])
                    .with_user_data(vec![0, 0, 0, 9, 1]),
            ),
            (
                "m3".to_string(),
                MemberSubscription::new(vec!["topic-a".to_string()]),
            ),
        ]);

        let assignor = LocalityAssignor::new(leader_at(Some("a")));
        let result = assignor.assign(&one_topic(4), &subscriptions).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(partitions_for(&result["m1"], "topic-a"), vec![0, 1, 2, 3]);
        assert!(result["m2"].is_empty());
        assert!(result["m3"].is_empty());
    }

    #[test]
    fn test_orphaned_topic_goes_to_its_subscribers() {
        // m2 is the only subscriber of topic-b but is not co-located
        let subscriptions = HashMap::from([
            ("m1".to_string(), member(&["topic-a"], &["a"])),
            ("m2".to_string(), member(&["topic-a", "topic-b"], &["b"])),
        ]);
        let partitions = HashMap::from([("topic-a".to_string(), 2), ("topic-b".to_string(), 3)]);

        let assignor = LocalityAssignor::new(leader_at(Some("a")));
        let result = assignor.assign(&partitions, &subscriptions).unwrap();

        assert_eq!(partitions_for(&result["m1"], "topic-a"), vec![0, 1]);
        assert!(partitions_for(&result["m2"], "topic-a").is_empty());
        assert_eq!(partitions_for(&result["m2"], "topic-b"), vec![0, 1, 2]);
    }

    #[test]
    fn test_discovery_failure_propagates() {
        let mut mock = MockLeaderDiscovery::new();
        mock.expect_current_leader_address()
            .times(1)
            .returning(|| Err(AssignorError::Discovery("connection refused".into())));

        let subscriptions = HashMap::from([("m1".to_string(), member(&["topic-a"], &["a"]))]);

        let assignor = LocalityAssignor::new(Arc::new(mock));
        let result = assignor.assign(&one_topic(2), &subscriptions);
        assert!(matches!(result, Err(AssignorError::Discovery(_))));
    }

    struct FailingStrategy;

    impl AssignmentStrategy for FailingStrategy {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn assign(&self, _input: &AssignmentInput) -> Result<AssignmentOutput> {
            Err(AssignorError::Strategy("out of partitions".into()))
        }
    }

    #[test]
    fn test_strategy_failure_propagates() {
        let subscriptions = HashMap::from([("m1".to_string(), member(&["topic-a"], &["a"]))]);

        let assignor =
            LocalityAssignor::with_strategy(leader_at(Some("a")), Box::new(FailingStrategy));
        let result = assignor.assign(&one_topic(2), &subscriptions);
        assert!(matches!(result, Err(AssignorError::Strategy(_))));
    }

    #[test]
    fn test_empty_group() {
        let assignor = LocalityAssignor::new(leader_at(Some("a")));
        let result = assignor.assign(&one_topic(2), &HashMap::new()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_candidate_members_sorted() {
        let subscriptions = HashMap::from([
            ("m3".to_string(), member(&["topic-a"], &["a"])),
            ("m1".to_string(), member(&["topic-a"], &["x", "a"])),
            ("m2".to_string(), member(&["topic-a"], &["b"])),
        ]);

        assert_eq!(
            LocalityAssignor::candidate_members(Some("a"), &subscriptions),
            vec!["m1", "m3"]
        );
        assert_eq!(
            LocalityAssignor::candidate_members(None, &subscriptions),
            vec!["m1", "m2", "m3"]
        );
        assert_eq!(
            LocalityAssignor::candidate_members(Some("z"), &subscriptions),
            vec!["m1", "m2", "m3"]
        );
    }

    #[test]
    fn test_subscription_user_data() {
        let mut mock = MockLeaderDiscovery::new();
        mock.expect_same_locality_addresses()
            .times(1)
            .returning(|| vec!["r1-node-1".to_string(), "r1-node-2".to_string()]);

        let assignor = LocalityAssignor::new(Arc::new(mock));
        let sub = assignor.subscription(vec!["topic-a".to_string()]).unwrap();

        assert_eq!(sub.topics, vec!["topic-a"]);
        assert_eq!(
            sub.eligible_leaders().into_inner(),
            vec!["r1-node-1", "r1-node-2"]
        );
    }

    #[test]
    fn test_as_strategy() {
        let subscriptions = HashMap::from([
            ("m1".to_string(), member(&["topic-a"], &["a"])),
            ("m2".to_string(), member(&["topic-a"], &["b"])),
        ]);
        let input = AssignmentInput::new(subscriptions, one_topic(2));

        let assignor = LocalityAssignor::new(leader_at(Some("b")));
        let result = AssignmentStrategy::assign(&assignor, &input).unwrap();

        assert!(result["m1"].is_empty());
        assert_eq!(partitions_for(&result["m2"], "topic-a"), vec![0, 1]);
    }

    #[test]
    fn test_from_config_applies_deadline() {
        let mut mock = MockLeaderDiscovery::new();
        mock.expect_current_leader_address().returning(|| {
            std::thread::sleep(std::time::Duration::from_millis(500));
            Ok(None)
        });

        let config = AssignorConfig {
            discovery_timeout_ms: 20,
            log_timing: true,
            ..AssignorConfig::default()
        };
        let assignor = LocalityAssignor::from_config(Arc::new(mock), &config);

        let subscriptions = HashMap::from([("m1".to_string(), member(&["topic-a"], &["a"]))]);
        let result = assignor.assign(&one_topic(1), &subscriptions);
        assert!(matches!(
            result,
            Err(AssignorError::DiscoveryTimeout { timeout_ms: 20 })
        ));
    }
}
