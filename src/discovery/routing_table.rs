//! Routing-table based leader discovery
//!
//! Clustered graph stores expose their routing table through an administrative
//! procedure (`dbms.cluster.routing.getRoutingTable`). The record lists every
//! server with its role; the server holding the `WRITE` role is the leader.
//!
//! ```json
//! {
//!   "ttl": 300,
//!   "servers": [
//!     { "addresses": ["r1-node-1:7687"], "role": "WRITE" },
//!     { "addresses": ["r1-node-2:7687", "r2-node-1:7687"], "role": "READ" },
//!     { "addresses": ["r1-node-1:7687", "r1-node-2:7687"], "role": "ROUTE" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LeaderDiscovery;
use crate::config::AssignorConfig;
use crate::constants::{ROLE_READ, ROLE_ROUTE, ROLE_WRITE};
use crate::error::Result;

/// One server entry of a routing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingServer {
    #[serde(default)]
    pub addresses: Vec<String>,
    pub role: String,
}

impl RoutingServer {
    pub fn is_leader(&self) -> bool {
        self.role == ROLE_WRITE
    }
}

/// Routing table snapshot as returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoutingTable {
    /// Seconds the table stays valid
    #[serde(default)]
    pub ttl: i64,
    #[serde(default)]
    pub servers: Vec<RoutingServer>,
}

impl RoutingTable {
    /// Parse the JSON form of a routing-table record
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// First address of the first server in the `WRITE` role
    pub fn leader_address(&self) -> Option<&str> {
        self.servers
            .iter()
            .find(|s| s.is_leader())
            .and_then(|s| s.addresses.first())
            .map(String::as_str)
    }

    pub fn readers(&self) -> Vec<&str> {
        self.addresses_with_role(ROLE_READ)
    }

    pub fn routers(&self) -> Vec<&str> {
        self.addresses_with_role(ROLE_ROUTE)
    }

    fn addresses_with_role(&self, role: &str) -> Vec<&str> {
        self.servers
            .iter()
            .filter(|s| s.role == role)
            .flat_map(|s| s.addresses.iter().map(String::as_str))
            .collect()
    }
}

/// Something that can run the routing-table query against the store
#[cfg_attr(test, mockall::automock)]
pub trait RoutingTableSource: Send + Sync {
    fn fetch_routing_table(&self) -> Result<RoutingTable>;
}

/// `LeaderDiscovery` backed by a routing-table query
///
/// Same-locality addresses come from configuration; they describe where this
/// member runs and do not change while it is alive.
pub struct RoutingTableDiscovery<S> {
    source: S,
    same_locality_addresses: Vec<String>,
}

impl<S: RoutingTableSource> RoutingTableDiscovery<S> {
    pub fn new(source: S, same_locality_addresses: Vec<String>) -> Self {
        Self {
            source,
            same_locality_addresses,
        }
    }

    pub fn from_config(source: S, config: &AssignorConfig) -> Self {
        Self::new(source, config.same_locality_addresses.clone())
    }
}

impl<S: RoutingTableSource> LeaderDiscovery for RoutingTableDiscovery<S> {
    fn current_leader_address(&self) -> Result<Option<String>> {
        let table = self.source.fetch_routing_table()?;
        let leader = table.leader_address().map(String::from);
        debug!(
            "Routing table: ttl={}s, servers={}, leader={:?}",
            table.ttl,
            table.servers.len(),
            leader
        );
        Ok(leader)
    }

    fn same_locality_addresses(&self) -> Vec<String> {
        self.same_locality_addresses.clone()
    }
}
