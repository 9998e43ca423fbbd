//! Key Module
//!
//! Cache keys double as file names and object keys, so they are restricted
//! to a small alphabet and checked before any I/O happens.

mod derive;
mod validate;

pub use derive::{cast_to_safe_cache_key, Procedure};
pub use validate::{is_valid_cache_key, CacheKey};

// == Public Constants ==
/// Maximum length of the human-readable input preview embedded in derived keys
pub const MAX_PREVIEW_LENGTH: usize = 100;
