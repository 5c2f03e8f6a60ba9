//! URL shortener service implementation.
//!
//! [`ShortenerService`] is the only component that talks to both the store
//! and the cache. It owns the collision-retry loop, the cache-aside read
//! path and the write-through / invalidate rules that keep the cache a
//! subset of the store. Core types are re-exported from `tinylink_core`.

mod cancel;
pub mod config;
pub mod service;

pub use config::ShortenerConfig;
pub use service::ShortenerService;
pub use tinylink_core::{ErrorKind, Shortener, ShortenerError};
