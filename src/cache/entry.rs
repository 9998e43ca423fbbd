//! Memory Entry Module
//!
//! Defines in-process mirror entries and the shared millisecond clock.

use chrono::Utc;

// == Memory Entry ==
/// Resolved value of a persisted record, held in process memory.
///
/// Carries the same expiry as the record it mirrors, so it never outlives it.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    /// The resolved value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl MemoryEntry {
    // == Constructor ==
    /// Creates a new memory entry expiring at `expires_at`.
    pub fn new(value: String, expires_at: Option<u64>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its expiration time.
    pub fn is_expired(&self) -> bool {
        is_expired_at(self.expires_at, current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

/// True if a record expiring at `expires_at` is expired at `now`.
///
/// `None` never expires; `Some(0)` (a tombstone) is always expired.
pub fn is_expired_at(expires_at: Option<u64>, now: u64) -> bool {
    match expires_at {
        Some(expires) => now >= expires,
        None => false,
    }
}
