//! Admission rules for user-supplied slugs.
//!
//! A slug is accepted when, after trimming, it:
//!
//! - is at most [`MAX_SLUG_SYMBOLS`] characters long
//! - contains no path/query delimiters (`/`, `\`, `?`, `#`, `%`) or control characters
//! - is not a dot segment (`.` or `..`)
//! - contains at least one real symbol (see [`is_real_symbol`])
//! - is not a route name (see [`RESERVED_SLUGS`])

use crate::error::AppError;
use serde_json::json;

/// Maximum number of characters in a slug.
pub const MAX_SLUG_SYMBOLS: usize = 32;

/// Route names that a slug would shadow. Compared case-insensitively.
pub const RESERVED_SLUGS: &[&str] = &["lasturl", "newurl", "static"];

const FORBIDDEN_CHARS: &[char] = &['/', '\\', '?', '#', '%'];

/// Returns `true` for characters that carry visible meaning in a slug.
///
/// Whitespace, the Punycode delimiter `-`, zero-width characters and emoji
/// variation selectors only decorate other symbols and do not count.
pub fn is_real_symbol(c: char) -> bool {
    !(c.is_whitespace()
        || c.is_control()
        || c == '-'
        || matches!(c, '\u{200B}'..='\u{200F}' | '\u{2060}' | '\u{FE0E}' | '\u{FE0F}'))
}

/// Validates a user-supplied slug and returns its trimmed form.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any admission rule is violated.
pub fn validate_custom_slug(raw: &str) -> Result<String, AppError> {
    let slug = raw.trim();

    if !slug.chars().any(is_real_symbol) {
        return Err(AppError::bad_request(
            "Slug must contain at least one real symbol",
            json!({ "slug": raw }),
        ));
    }

    let length = slug.chars().count();
    if length > MAX_SLUG_SYMBOLS {
        return Err(AppError::bad_request(
            format!("Slug must be at most {MAX_SLUG_SYMBOLS} symbols"),
            json!({ "provided_length": length }),
        ));
    }

    if slug
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_CHARS.contains(&c))
    {
        return Err(AppError::bad_request(
            "Slug cannot contain '/', '\\', '?', '#', '%' or control characters",
            json!({ "slug": slug }),
        ));
    }

    // URL parsers collapse dot segments before the path reaches the router.
    if slug == "." || slug == ".." {
        return Err(AppError::bad_request(
            "Slug cannot be a dot segment",
            json!({ "slug": slug }),
        ));
    }

    if RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
    {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(slug.to_string())
}
