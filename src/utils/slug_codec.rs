//! Reversible slug ↔ storage key encoding.
//!
//! Slugs are arbitrary Unicode (usually emoji). Keys are their RFC 3492
//! Punycode form, which is plain ASCII (`[A-Za-z0-9-]`) and therefore safe to
//! index, compare byte-wise, and log.
//!
//! ```ignore
//! let key = encode("🎉🎈").unwrap();
//! assert!(key.is_ascii());
//! assert_eq!(decode(&key).unwrap(), "🎉🎈");
//! ```

use idna::punycode;

/// Errors produced by the slug codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The input exceeds the Punycode arithmetic bound (thousands of symbols).
    #[error("Slug is too long to encode")]
    Overflow,

    #[error("Key is not a valid encoded slug: {0}")]
    InvalidKey(String),
}

/// Encodes a raw slug into its storage key.
///
/// Deterministic: equal inputs always produce equal keys.
///
/// # Errors
///
/// Returns [`CodecError::Overflow`] only for inputs far longer than any
/// admissible slug.
pub fn encode(raw: &str) -> Result<String, CodecError> {
    punycode::encode_str(raw).ok_or(CodecError::Overflow)
}

/// Decodes a storage key back into the raw slug it was produced from.
///
/// # Errors
///
/// Returns [`CodecError::InvalidKey`] if `key` was not produced by [`encode`].
pub fn decode(key: &str) -> Result<String, CodecError> {
    punycode::decode_to_string(key).ok_or_else(|| CodecError::InvalidKey(key.to_string()))
}
