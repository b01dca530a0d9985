// Configuration module for the regional assignor
//
// The assignor is configured from the same flat property map the host hands
// to its consumer, so keys are namespaced under `regional.`. Unknown keys
// belong to the consumer and are ignored here.

use std::collections::HashMap;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DISCOVERY_TIMEOUT_MS, DEFAULT_LOG_TIMING, MAX_DISCOVERY_TIMEOUT_MS,
    MIN_DISCOVERY_TIMEOUT_MS, PROP_DISCOVERY_TIMEOUT_MS, PROP_LOG_TIMING,
    PROP_SAME_LOCALITY_ADDRESSES,
};
use crate::error::{AssignorError, Result};

/// Configuration struct holding all assignor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignorConfig {
    /// Store servers in this member's data center, advertised in subscriptions
    pub same_locality_addresses: Vec<String>,
    /// Deadline applied to each leader-discovery query
    pub discovery_timeout_ms: u64,
    /// Log the duration of every assignment at info level
    pub log_timing: bool,
}

impl Default for AssignorConfig {
    fn default() -> Self {
        Self {
            same_locality_addresses: Vec::new(),
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            log_timing: DEFAULT_LOG_TIMING,
        }
    }
}

impl AssignorConfig {
    /// Build a config from host properties, falling back to defaults for missing keys
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = props.get(PROP_SAME_LOCALITY_ADDRESSES) {
            config.same_locality_addresses = parse_address_list(raw);
        }

        if let Some(raw) = props.get(PROP_DISCOVERY_TIMEOUT_MS) {
            let timeout_ms: u64 = raw.trim().parse().map_err(|_| {
                AssignorError::InvalidConfig(format!(
                    "{} must be an integer, got '{}'",
                    PROP_DISCOVERY_TIMEOUT_MS, raw
                ))
            })?;
            if !(MIN_DISCOVERY_TIMEOUT_MS..=MAX_DISCOVERY_TIMEOUT_MS).contains(&timeout_ms) {
                return Err(AssignorError::InvalidConfig(format!(
                    "{} must be between {} and {}, got {}",
                    PROP_DISCOVERY_TIMEOUT_MS,
                    MIN_DISCOVERY_TIMEOUT_MS,
                    MAX_DISCOVERY_TIMEOUT_MS,
                    timeout_ms
                )));
            }
            config.discovery_timeout_ms = timeout_ms;
        }

        if let Some(raw) = props.get(PROP_LOG_TIMING) {
            config.log_timing = parse_bool(PROP_LOG_TIMING, raw)?;
        }

        Ok(config)
    }

    /// Leader-discovery deadline as a `Duration`
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }
}

fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        other => Err(AssignorError::InvalidConfig(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
