//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::UrlRepository`] trait
//! and expose the operations HTTP handlers call.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation, resolution and listing
//! - [`services::key_generator::KeyGenerator`] - Custom slug validation and random slug synthesis
//! - [`services::throttle_service::Throttler`] - Per-client slow-down and hard cap

pub mod services;
