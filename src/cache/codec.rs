//! Entry Codec Module
//!
//! Serializes a value together with its expiry into the pretty-printed JSON
//! record kept on the backend:
//!
//! ```json
//! {
//!   "expiresAtMillis": 1700000000000,
//!   "observabilityDeserialized": true,
//!   "value": {"name":"atlantis","galaxy":"pegasus"}
//! }
//! ```
//!
//! When the value is itself JSON it is embedded as a nested document so the
//! record is easy to read by hand; otherwise it is stored as a JSON string.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

use crate::cache::entry::is_expired_at;

/// Expiry written for tombstones.
pub const TOMBSTONE_EXPIRES_AT: u64 = 0;

// == Corrupt Record ==
/// A persisted record that could not be decoded. Read as a miss.
#[derive(Error, Debug)]
#[error("corrupt cache record: {0}")]
pub struct CorruptRecord(#[from] serde_json::Error);

// == Stored Entry ==
/// On-backend shape of a cache record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    /// Unix milliseconds; `null` never expires, `0` marks a tombstone
    pub expires_at_millis: Option<u64>,
    /// True if `value` holds the caller's JSON text as a nested document
    pub observability_deserialized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Box<RawValue>>,
}

impl StoredEntry {
    /// Reconstructs exactly the string originally given to `set`.
    pub fn resolved_value(&self) -> Result<Option<String>, CorruptRecord> {
        match (&self.value, self.observability_deserialized) {
            (None, _) => Ok(None),
            (Some(raw), true) => Ok(Some(raw.get().to_string())),
            (Some(raw), false) => Ok(Some(serde_json::from_str::<String>(raw.get())?)),
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        is_expired_at(self.expires_at_millis, now)
    }
}

// == Encode ==
/// Builds the persisted record for `value`.
///
/// `None` produces a tombstone: no value and an expiry of `0`, whatever
/// `expires_at_millis` was passed.
pub fn encode(
    value: Option<&str>,
    expires_at_millis: Option<u64>,
) -> Result<String, serde_json::Error> {
    let entry = match value {
        None => StoredEntry {
            expires_at_millis: Some(TOMBSTONE_EXPIRES_AT),
            observability_deserialized: false,
            value: None,
        },
        Some(value) => match as_observable_json(value) {
            Some(raw) => StoredEntry {
                expires_at_millis,
                observability_deserialized: true,
                value: Some(raw),
            },
            None => StoredEntry {
                expires_at_millis,
                observability_deserialized: false,
                value: Some(RawValue::from_string(serde_json::to_string(value)?)?),
            },
        },
    };

    serde_json::to_string_pretty(&entry)
}

// == Decode ==
pub fn decode(raw: &str) -> Result<StoredEntry, CorruptRecord> {
    let entry: StoredEntry = serde_json::from_str(raw)?;
    // Surface a malformed string value now rather than on read
    entry.resolved_value()?;
    Ok(entry)
}

/// Returns the value as a raw JSON document if storing it that way is lossless.
///
/// Whitespace around the document would be dropped by the parser, and a bare
/// `null` would read back as a tombstone, so both are stored as strings.
fn as_observable_json(value: &str) -> Option<Box<RawValue>> {
    if value == "null" {
        return None;
    }
    let raw: Box<RawValue> = serde_json::from_str(value).ok()?;
    (raw.get() == value).then_some(raw)
}
