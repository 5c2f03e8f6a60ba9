//! Core types and traits for the tinylink URL shortener.
//!
//! This crate holds the record type, the short code newtype, the store and
//! cache contracts the shortener is written against, and the error taxonomy
//! shared by every other crate in the workspace.

pub mod base62;
pub mod cache;
pub mod error;
pub mod shortcode;
pub mod shortener;
pub mod store;

pub use cache::UrlCache;
pub use error::{CacheError, ErrorKind, ShortenerError, StorageError};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
pub use store::{IncrementOutcome, InsertOutcome, UrlRecord, UrlStore};
