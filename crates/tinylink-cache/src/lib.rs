//! [`UrlCache`](tinylink_core::UrlCache) implementations.
//!
//! * [`MokaUrlCache`] - in-process, bounded, optional TTL/TTI.
//! * [`RedisUrlCache`] - shared across nodes, records stored as JSON.
//! * [`LayeredCache`] - an L1 in front of an L2 (typically Moka over Redis).
//! * [`NoopCache`] - caches nothing; every read is a miss.

pub mod layered;
pub mod moka;
pub mod noop;
pub mod redis;

pub use layered::LayeredCache;
pub use self::moka::{MokaCacheConfig, MokaUrlCache};
pub use noop::NoopCache;
pub use self::redis::RedisUrlCache;
