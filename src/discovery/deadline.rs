//! Deadline-bounded leader discovery
//!
//! Assignment runs on the consumer's poll thread, and a group leader that
//! stalls inside `assign` past the session timeout gets evicted, triggering
//! yet another rebalance. `DeadlineDiscovery` runs the leader query on a
//! worker thread and gives up after a fixed deadline, surfacing
//! `AssignorError::DiscoveryTimeout` instead of hanging.
//!
//! A query that outlives its deadline keeps running on its worker thread; its
//! result is dropped when it eventually arrives.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use tracing::warn;

use super::LeaderDiscovery;
use crate::config::AssignorConfig;
use crate::error::{AssignorError, Result};

pub struct DeadlineDiscovery {
    inner: Arc<dyn LeaderDiscovery>,
    timeout: Duration,
}

impl DeadlineDiscovery {
    pub fn new(inner: Arc<dyn LeaderDiscovery>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn from_config(inner: Arc<dyn LeaderDiscovery>, config: &AssignorConfig) -> Self {
        Self::new(inner, config.discovery_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl LeaderDiscovery for DeadlineDiscovery {
    fn current_leader_address(&self) -> Result<Option<String>> {
        let (tx, rx) = bounded(1);
        let inner = Arc::clone(&self.inner);

        thread::Builder::new()
            .name("leader-discovery".to_string())
            .spawn(move || {
                // Receiver is gone once the deadline passed; nothing to report
                let _ = tx.send(inner.current_leader_address());
            })
            .map_err(|e| {
                AssignorError::Discovery(format!("Failed to spawn discovery thread: {}", e))
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!("Leader discovery exceeded its {} ms deadline", timeout_ms);
                Err(AssignorError::DiscoveryTimeout { timeout_ms })
            }
            Err(RecvTimeoutError::Disconnected) => Err(AssignorError::Discovery(
                "Discovery thread exited without a result".to_string(),
            )),
        }
    }

    fn same_locality_addresses(&self) -> Vec<String> {
        self.inner.same_locality_addresses()
    }
}
