//! Assignor constants
//!
//! Protocol names, wire-format limits and configuration defaults in one place.

// ===== Protocol =====

/// Assignment protocol name advertised in JoinGroup
pub const REGIONAL_ASSIGNOR_NAME: &str = "regional-assignor";

// ===== Locality Wire Format =====

/// Size of the element count prefix (i32, big-endian)
pub const LEADER_COUNT_SIZE: usize = 4;

/// Size of each string length prefix (i16, big-endian)
pub const LEADER_LENGTH_SIZE: usize = 2;

/// Longest address the wire format can carry, in UTF-8 bytes
pub const MAX_LEADER_ADDRESS_LEN: usize = i16::MAX as usize;

// ===== Routing Table Roles =====

/// Role of the server currently accepting writes
pub const ROLE_WRITE: &str = "WRITE";

/// Role of read replicas
pub const ROLE_READ: &str = "READ";

/// Role of routing servers
pub const ROLE_ROUTE: &str = "ROUTE";

// ===== Configuration Keys =====

/// Comma-separated addresses of store servers in this member's data center
pub const PROP_SAME_LOCALITY_ADDRESSES: &str = "regional.same-locality-addresses";

/// Deadline for one leader-discovery query, milliseconds
pub const PROP_DISCOVERY_TIMEOUT_MS: &str = "regional.discovery-timeout-ms";

/// Log the duration of every assignment at info level
pub const PROP_LOG_TIMING: &str = "regional.log-timing";

// ===== Configuration Defaults and Bounds =====

/// Default leader-discovery deadline
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 10_000;

/// Minimum leader-discovery deadline
pub const MIN_DISCOVERY_TIMEOUT_MS: u64 = 10;

/// Maximum leader-discovery deadline (a consumer session timeout is far shorter)
pub const MAX_DISCOVERY_TIMEOUT_MS: u64 = 300_000;

/// Default for timing instrumentation
pub const DEFAULT_LOG_TIMING: bool = false;
