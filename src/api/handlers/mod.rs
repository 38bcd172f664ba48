//! HTTP request handlers for API endpoints.

pub mod fallback;
pub mod last_url;
pub mod new_url;

pub use fallback::not_found_handler;
pub use last_url::last_url_handler;
pub use new_url::new_url_handler;
