//! HTTP middleware for request processing and protection.
//!
//! Provides throttling, panic recovery, and observability middleware.

pub mod panic;
pub mod throttle;
pub mod tracing;
