//! Safe key derivation
//!
//! Turns a procedure name, its version and the input it ran with into a
//! key that is safe as a file name or object key and unique per input.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::key::{CacheKey, MAX_PREVIEW_LENGTH};

// == Procedure ==
/// Identifies the procedure whose results are being cached.
///
/// Bumping `version` changes every derived key, which invalidates all results
/// cached by prior versions of the procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    /// Namespace for the procedure's keys
    pub name: String,
    /// Optional version of the procedure's logic
    pub version: Option<String>,
}

impl Procedure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

// == Cast To Safe Cache Key ==
/// Derives `{name}.{input preview}.{sha256 of input and version}`.
///
/// The input is serialized with sorted object keys, so equal inputs always
/// derive equal keys. Fails with `InvalidKey` if the procedure name itself
/// uses characters outside the key alphabet.
pub fn cast_to_safe_cache_key<T: Serialize + ?Sized>(
    procedure: &Procedure,
    input: &T,
) -> Result<CacheKey> {
    // Going through `Value` sorts object keys
    let input = serde_json::to_value(input)?;
    let serialized_input = serde_json::to_string(&input)?;

    let version_hash = procedure.version.as_deref().map(sha256_hex);
    let fingerprint = sha256_hex(&serde_json::to_string(&(&input, version_hash))?);

    let preview = input_preview(&serialized_input);
    let key = [procedure.name.as_str(), preview.as_str(), fingerprint.as_str()].join(".");

    CacheKey::try_from(key)
}

/// Human-readable, alphabet-safe preview of the serialized input.
fn input_preview(serialized: &str) -> String {
    let mut preview = String::with_capacity(serialized.len().min(MAX_PREVIEW_LENGTH));
    for c in serialized.chars() {
        let c = match c {
            '{' | '}' | '[' | ']' | ':' | ',' => '_',
            c if c.is_ascii_alphanumeric() || c == '_' => c,
            _ => continue,
        };
        if c == '_' && preview.ends_with('_') {
            continue;
        }
        preview.push(c);
    }
    preview.truncate(MAX_PREVIEW_LENGTH);

    let preview = preview.strip_prefix('_').unwrap_or(&preview);
    let preview = preview.strip_suffix('_').unwrap_or(preview);
    preview.to_string()
}

fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde_json::json;

    #[test]
    fn test_preview_strips_json_punctuation() {
        let preview = input_preview(r#"{"city":"atlantis","code":821}"#);
        assert_eq!(preview, "city_atlantis_code_821");
    }

    #[test]
    fn test_preview_collapses_underscores_and_trims() {
        assert_eq!(input_preview("[[[a]]]"), "a");
        assert_eq!(input_preview("__x__y__"), "x_y");
        assert_eq!(input_preview("\"hello world!\""), "helloworld");
    }

    #[test]
    fn test_preview_is_truncated() {
        let long = "a".repeat(500);
        assert_eq!(input_preview(&long).len(), MAX_PREVIEW_LENGTH);
    }

    #[test]
    fn test_derived_key_layout() {
        let procedure = Procedure::new("getWeather");
        let key = cast_to_safe_cache_key(&procedure, &json!({ "city": "atlantis" })).unwrap();

        let parts: Vec<&str> = key.as_str().split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "getWeather");
        assert_eq!(parts[1], "city_atlantis");
        assert_eq!(parts[2].len(), 64);
        assert!(parts[2].bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derived_key_ignores_object_key_order() {
        let procedure = Procedure::new("lookup");
        let a = cast_to_safe_cache_key(&procedure, &json!({ "a": 1, "b": 2 })).unwrap();
        let b = cast_to_safe_cache_key(&procedure, &json!({ "b": 2, "a": 1 })).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_version_changes_the_key() {
        let input = json!({ "q": "tootsie pop" });
        let v1 =
            cast_to_safe_cache_key(&Procedure::new("licks").with_version("1"), &input).unwrap();
        let v2 =
            cast_to_safe_cache_key(&Procedure::new("licks").with_version("2"), &input).unwrap();
        let unversioned = cast_to_safe_cache_key(&Procedure::new("licks"), &input).unwrap();

        assert_ne!(v1, v2);
        assert_ne!(v1, unversioned);
    }

    #[test]
    fn test_different_inputs_with_same_preview_differ() {
        let procedure = Procedure::new("p");
        let a = cast_to_safe_cache_key(&procedure, "a b").unwrap();
        let b = cast_to_safe_cache_key(&procedure, "ab").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_procedure_name_is_rejected() {
        let result = cast_to_safe_cache_key(&Procedure::new("bad name"), &json!(1));
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }
}
