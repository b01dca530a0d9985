//! Locality metadata codec
//!
//! Each member attaches the addresses of the write-leader candidates it shares
//! a data center with to its subscription `user_data`. Every member of a group
//! must use this exact layout so the elected leader can read all payloads.
//!
//! # Wire Format
//!
//! ```text
//! eligible_leaders: [String]
//!   - array_length: i32
//!   - for each address:
//!     - string_length: i16
//!     - string_bytes: [u8]  (UTF-8)
//! ```
//!
//! Decoding fails open: a payload that does not parse is treated as an empty
//! leader set, which only excludes that one member from the candidate set.

use bytes::{Buf, BufMut};
use tracing::warn;

use crate::constants::{LEADER_COUNT_SIZE, LEADER_LENGTH_SIZE, MAX_LEADER_ADDRESS_LEN};
use crate::error::{AssignorError, Result};

/// Ordered list of leader addresses a member is co-located with
///
/// Duplicates are kept and order is preserved on the wire; neither matters
/// for candidate selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EligibleLeaders(Vec<String>);

impl EligibleLeaders {
    pub fn new(addresses: Vec<String>) -> Self {
        Self(addresses)
    }

    /// Decode a member payload, yielding an empty set on any structural error
    pub fn decode(bytes: &[u8]) -> Self {
        Self(decode_eligible_leaders(bytes))
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_eligible_leaders(&self.0)
    }

    /// Exact string match against a leader address
    pub fn contains(&self, address: &str) -> bool {
        self.0.iter().any(|a| a == address)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Encode leader addresses into the locality wire format
///
/// # Errors
/// `AssignorError::Encoding` if an address is longer than `i16::MAX` bytes or
/// there are more than `i32::MAX` addresses.
pub fn encode_eligible_leaders(leaders: &[String]) -> Result<Vec<u8>> {
    let count = i32::try_from(leaders.len()).map_err(|_| {
        AssignorError::Encoding(format!("Too many leader addresses: {}", leaders.len()))
    })?;

    let payload_len: usize = leaders
        .iter()
        .map(|l| LEADER_LENGTH_SIZE + l.len())
        .sum();
    let mut buf = Vec::with_capacity(LEADER_COUNT_SIZE + payload_len);

    buf.put_i32(count);
    for leader in leaders {
        let leader_bytes = leader.as_bytes();
        if leader_bytes.len() > MAX_LEADER_ADDRESS_LEN {
            return Err(AssignorError::Encoding(format!(
                "Leader address is {} bytes (max {})",
                leader_bytes.len(),
                MAX_LEADER_ADDRESS_LEN
            )));
        }
        buf.put_i16(leader_bytes.len() as i16);
        buf.put_slice(leader_bytes);
    }

    Ok(buf)
}

/// Decode a locality payload, treating any malformed input as an empty set
///
/// Never fails: the error is logged and the member simply advertises no
/// leaders for this round.
pub fn decode_eligible_leaders(bytes: &[u8]) -> Vec<String> {
    match try_decode_eligible_leaders(bytes) {
        Ok(leaders) => leaders,
        Err(e) => {
            warn!(
                "Ignoring undecodable locality metadata ({} bytes): {}",
                bytes.len(),
                e
            );
            Vec::new()
        }
    }
}

/// Strict decode of a locality payload
///
/// # Errors
/// `AssignorError::CorruptMessage` for a truncated buffer, a negative count or
/// string length, a length running past the end, invalid UTF-8, or bytes left
/// over after the last address.
pub fn try_decode_eligible_leaders(bytes: &[u8]) -> Result<Vec<String>> {
    let mut buf = bytes;

    if buf.remaining() < LEADER_COUNT_SIZE {
        return Err(AssignorError::CorruptMessage {
            message: format!(
                "Locality metadata too short: {} bytes (need at least {})",
                buf.remaining(),
                LEADER_COUNT_SIZE
            ),
        });
    }

    let count = buf.get_i32();
    if count < 0 {
        return Err(AssignorError::CorruptMessage {
            message: format!("Invalid leader array length: {}", count),
        });
    }

    // Each entry needs at least its length prefix; reject before allocating
    let count = count as usize;
    if buf.remaining() < count.saturating_mul(LEADER_LENGTH_SIZE) {
        return Err(AssignorError::CorruptMessage {
            message: format!(
                "Leader array length {} exceeds remaining data {}",
                count,
                buf.remaining()
            ),
        });
    }

    let mut leaders = Vec::with_capacity(count);
    for idx in 0..count {
        if buf.remaining() < LEADER_LENGTH_SIZE {
            return Err(AssignorError::CorruptMessage {
                message: format!("Unexpected end of data reading length of leader {}", idx),
            });
        }

        let str_len = buf.get_i16();
        if str_len < 0 {
            return Err(AssignorError::CorruptMessage {
                message: format!("Null leader address at index {}", idx),
            });
        }

        let str_len = str_len as usize;
        if buf.remaining() < str_len {
            return Err(AssignorError::CorruptMessage {
                message: format!(
                    "Leader address length {} exceeds remaining data {}",
                    str_len,
                    buf.remaining()
                ),
            });
        }

        let leader = std::str::from_utf8(&buf[..str_len])
            .map_err(|e| AssignorError::CorruptMessage {
                message: format!("Invalid UTF-8 in leader address: {}", e),
            })?
            .to_string();
        buf.advance(str_len);

        leaders.push(leader);
    }

    if buf.has_remaining() {
        return Err(AssignorError::CorruptMessage {
            message: format!("{} trailing bytes after leader array", buf.remaining()),
        });
    }

    Ok(leaders)
}
