use crate::error::CacheError;
use crate::shortcode::ShortCode;
use crate::store::UrlRecord;
use async_trait::async_trait;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache for URL records.
///
/// This trait provides a domain-specific caching abstraction for [`UrlRecord`]s,
/// using [`ShortCode`] as the key. Implementations can use Redis, in-memory
/// caches, or other backends, and may evict or expire entries at will.
///
/// A cached record may carry a stale `click_count`: a read that misses the
/// cache can fetch a record, lose the race to a concurrent increment and its
/// invalidation, and then write the older record back. The entry stays stale
/// until it expires or the next increment invalidates it, so backends should
/// be given a finite TTL. `original_url` never changes and is always exact.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get URL record from cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Store URL record in cache, replacing any previous entry.
    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()>;

    /// Remove URL record from cache.
    ///
    /// It is not an error if the key does not exist.
    async fn invalidate(&self, code: &ShortCode) -> Result<()>;
}
