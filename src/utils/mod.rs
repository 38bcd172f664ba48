//! Utility functions for slug handling, URL validation, and request inspection.
//!
//! - [`slug_codec`] - Reversible slug ↔ storage key encoding
//! - [`slug`] - Admission rules for user-supplied slugs
//! - [`emoji_alphabet`] - Random slug synthesis
//! - [`url_validator`] - Target URL validation
//! - [`client_ip`] - Client identity extraction for throttling

pub mod client_ip;
pub mod emoji_alphabet;
pub mod slug;
pub mod slug_codec;
pub mod url_validator;
