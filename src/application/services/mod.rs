//! Business logic services for the application layer.

pub mod key_generator;
pub mod throttle_service;
pub mod url_service;

pub use key_generator::KeyGenerator;
pub use throttle_service::{ThrottlePolicy, Throttler};
pub use url_service::UrlService;
