//! Item identifiers
//!
//! ID Format: `i-{12-char-hash}` (e.g., `i-7f2b4c1a09de`)
//!
//! Hash is derived from the creation timestamp and a process-wide sequence
//! number, so two items created in the same instant still get distinct IDs.
//! IDs are opaque: nothing parses meaning out of the hash.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const HASH_LEN: usize = 12;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a hash from timestamp, sequence number and process id
fn generate_hash(timestamp: DateTime<Utc>) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let input = format!(
        "{}:{}:{}",
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        sequence,
        std::process::id()
    );
    let hash = blake3::hash(input.as_bytes());
    hash.to_hex()[..HASH_LEN].to_string()
}

/// Item ID in the format `i-{12-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct ItemId {
    hash: String,
}

impl ItemId {
    /// Creates a fresh item ID for the given creation time
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(timestamp),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i-{}", self.hash)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}
