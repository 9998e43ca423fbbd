//! Cache Module
//!
//! Backend-persisted TTL cache: a codec for records, a store for single
//! records, an index of valid keys, and an in-process read-through layer,
//! composed by [`DiskCache`].

mod codec;
mod entry;
mod entry_store;
mod facade;
mod key_index;
mod memory;
mod stats;
mod value;


// Re-export public types
pub use codec::{decode, encode, CorruptRecord, StoredEntry, TOMBSTONE_EXPIRES_AT};
pub use entry::{current_timestamp_ms, MemoryEntry};
pub use entry_store::{EntryStore, ResolvedEntry, StoredWrite};
pub use facade::DiskCache;
pub use key_index::{KeyIndex, KeyIndexEntry, KEY_INDEX_KEY};
pub use memory::MemoryCache;
pub use stats::CacheStats;
pub use value::{CacheValue, Expiration, SetOptions};

// == Public Constants ==
/// Default seconds until a value expires when neither the call nor the
/// config says otherwise
pub const DEFAULT_EXPIRATION_SECS: u64 = 5 * 60;
