//! Cache key validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Cache Key ==
/// A key restricted to `[A-Za-z0-9._-]+`.
///
/// Holding a `CacheKey` proves the string was validated, so the stores
/// never re-check it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(String);

impl CacheKey {
    /// Validates `key` and wraps it.
    pub fn parse(key: &str) -> Result<Self> {
        if is_valid_cache_key(key) {
            Ok(Self(key.to_string()))
        } else {
            Err(CacheError::InvalidKey(key.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true if `key` is non-empty and uses only `[A-Za-z0-9._-]`.
pub fn is_valid_cache_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
}

impl TryFrom<String> for CacheKey {
    type Error = CacheError;

    fn try_from(key: String) -> Result<Self> {
        if is_valid_cache_key(&key) {
            Ok(Self(key))
        } else {
            Err(CacheError::InvalidKey(key))
        }
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_alphabet() {
        for key in ["meaning-of-life", "a", "v1.2.3", "snake_case_KEY", "..", "-"] {
            assert!(CacheKey::parse(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn test_rejects_path_and_object_key_injection() {
        for key in [
            "",
            "../etc/passwd",
            "a/b",
            "with space",
            "~keys",
            "tab\t",
            "ünïcode",
            "a\\b",
        ] {
            let result = CacheKey::parse(key);
            assert!(
                matches!(result, Err(CacheError::InvalidKey(ref k)) if k == key),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_rejects_invalid_key() {
        let ok: CacheKey = serde_json::from_str("\"city\"").unwrap();
        assert_eq!(ok.as_str(), "city");

        let bad = serde_json::from_str::<CacheKey>("\"a/b\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = CacheKey::parse("city").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"city\"");
        assert_eq!(key.to_string(), "city");
    }
}
