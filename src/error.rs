//! Assignor error types
//!
//! Errors raised while computing an assignment or encoding locality metadata.
//! Payload decode failures are reported through `CorruptMessage` but the
//! fail-open decoder never hands them to the coordinator.

use thiserror::Error;

/// Errors that can occur during partition assignment
#[derive(Error, Debug)]
pub enum AssignorError {
    /// Locality payload is structurally invalid
    #[error("Corrupt locality metadata: {message}")]
    CorruptMessage { message: String },

    /// Value cannot be represented in the locality wire format
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Leader discovery failed (connectivity, query error)
    #[error("Leader discovery failed: {0}")]
    Discovery(String),

    /// Leader discovery did not answer before the deadline
    #[error("Leader discovery timed out after {timeout_ms} ms")]
    DiscoveryTimeout { timeout_ms: u64 },

    /// Fallback distribution strategy failed
    #[error("Fallback strategy error: {0}")]
    Strategy(String),

    /// Coordinator passed a negative partition count
    #[error("Invalid partition count {count} for topic {topic}")]
    InvalidPartitionCount { topic: String, count: i32 },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Routing table record could not be deserialized
    #[error("Routing table error: {0}")]
    RoutingTable(#[from] serde_json::Error),
}

impl AssignorError {
    /// Whether the coordinator should retry the rebalance after this error
    ///
    /// Discovery and strategy failures are transient from the group's point of
    /// view; configuration and encoding errors will fail again on retry.
    pub fn is_retriable(&self) -> bool {
        match self {
            AssignorError::Discovery(_)
            | AssignorError::DiscoveryTimeout { .. }
            | AssignorError::Strategy(_)
            | AssignorError::RoutingTable(_) => true,
            AssignorError::CorruptMessage { .. }
            | AssignorError::Encoding(_)
            | AssignorError::InvalidPartitionCount { .. }
            | AssignorError::InvalidConfig(_) => false,
        }
    }
}

/// Result type alias for assignor operations
pub type Result<T> = std::result::Result<T, AssignorError>;
