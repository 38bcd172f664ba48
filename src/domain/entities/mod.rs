//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`UrlRecord`] - A persisted slug → target URL mapping
//! - [`NewUrlRecord`] - Input for creating a record
//! - [`RecordCursor`] - Keyset position for newest-first paging

pub mod url_record;

pub use url_record::{NewUrlRecord, RecordCursor, UrlRecord};
