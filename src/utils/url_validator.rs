//! Target URL validation.
//!
//! Target URLs are stored exactly as submitted (minus surrounding whitespace)
//! so that a record resolves to the URL its creator typed. Validation only
//! rejects input that is not an absolute HTTP(S) URL with a host.

use url::Url;

/// Maximum accepted length of a target URL, in bytes.
pub const MAX_TARGET_URL_LENGTH: usize = 2048;

/// Errors that can occur during target URL validation.
#[derive(Debug, thiserror::Error)]
pub enum TargetUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL is longer than {MAX_TARGET_URL_LENGTH} characters")]
    TooLong,
}

/// Validates a target URL and returns it trimmed.
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
///
/// # Errors
///
/// Returns [`TargetUrlError::InvalidFormat`] for malformed URLs,
/// [`TargetUrlError::UnsupportedProtocol`] for non-HTTP(S) schemes,
/// [`TargetUrlError::MissingHost`] when no host is present and
/// [`TargetUrlError::TooLong`] for oversized input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     validate_target_url(" https://example.com ").unwrap(),
///     "https://example.com"
/// );
/// assert!(validate_target_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<String, TargetUrlError> {
    let input = input.trim();

    if input.len() > MAX_TARGET_URL_LENGTH {
        return Err(TargetUrlError::TooLong);
    }

    let url = Url::parse(input).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(TargetUrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetUrlError::MissingHost);
    }

    Ok(input.to_string())
}
