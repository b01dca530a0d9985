//! Leader discovery
//!
//! The assignor anchors locality on the distributed store's current write
//! leader. Finding that leader, and knowing which store servers share a data
//! center with this member, are services provided by the host; this module
//! defines the contract and a routing-table based implementation of it.
//!
//! - `LeaderDiscovery` is what the assignor consumes
//! - `RoutingTableDiscovery` answers it from the store's routing-table query
//! - `DeadlineDiscovery` bounds any discovery with a timeout

pub mod deadline;
pub mod routing_table;

use std::sync::Arc;

use crate::error::Result;

pub use deadline::DeadlineDiscovery;
pub use routing_table::{RoutingServer, RoutingTable, RoutingTableDiscovery, RoutingTableSource};

/// Source of write-leader and locality information
///
/// `current_leader_address` may perform network I/O and is called once per
/// rebalance round by the elected group leader. Implementations are shared
/// across threads and own their synchronization.
#[cfg_attr(test, mockall::automock)]
pub trait LeaderDiscovery: Send + Sync {
    /// Address of the store's current write leader, `None` when no leader is known
    ///
    /// # Errors
    /// Connectivity or query failures. These abort the assignment round.
    fn current_leader_address(&self) -> Result<Option<String>>;

    /// Addresses of store servers in this member's data center
    ///
    /// Called when building this member's subscription; the result is what
    /// the member advertises as its eligible leaders.
    fn same_locality_addresses(&self) -> Vec<String>;
}

impl<T: LeaderDiscovery + ?Sized> LeaderDiscovery for Arc<T> {
    fn current_leader_address(&self) -> Result<Option<String>> {
        (**self).current_leader_address()
    }

    fn same_locality_addresses(&self) -> Vec<String> {
        (**self).same_locality_addresses()
    }
}
