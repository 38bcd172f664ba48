//! HTML template rendering handlers.

mod landing;
mod resolve;

pub use landing::landing_handler;
pub use resolve::resolve_handler;
