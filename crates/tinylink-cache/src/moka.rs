use ::moka::future::Cache;
use async_trait::async_trait;
use std::time::Duration;
use tinylink_core::cache::Result;
use tinylink_core::{ShortCode, UrlCache, UrlRecord};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory cache implementation using Moka.
///
/// This implementation stores URL records in a concurrent, high-performance
/// in-memory cache. It's ideal for single-node deployments or as a L1 cache
/// in front of Redis.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<String, UrlRecord>,
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache holding at most 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Creates a new Moka URL cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> MokaCacheConfigBuilder {
        MokaCacheConfig::builder()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Fetching URL record from Moka cache");

        match self.cache.get(code.as_str()).await {
            Some(record) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()> {
        trace!(code = %code, "Storing URL record in Moka cache");

        self.cache
            .insert(code.as_str().to_string(), record.clone())
            .await;
        debug!(code = %code, "Cached record in Moka");
        Ok(())
    }

    async fn invalidate(&self, code: &ShortCode) -> Result<()> {
        trace!(code = %code, "Removing URL record from Moka cache");

        self.cache.invalidate(code.as_str()).await;
        debug!(code = %code, "Removed record from Moka cache (if present)");
        Ok(())
    }
}

/// Configuration for creating a [`MokaUrlCache`] with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct MokaCacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

impl From<MokaCacheConfig> for MokaUrlCache {
    fn from(config: MokaCacheConfig) -> Self {
        let mut builder =
            Cache::builder().max_capacity(config.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY));

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn test_record(c: &str, url: &str) -> UrlRecord {
        UrlRecord::new(code(c), url)
    }

    #[tokio::test]
    async fn cache_get_and_set() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");
        let record = test_record("abc123", "https://example.com");

        assert!(cache.get_url(&c).await.unwrap().is_none());

        cache.set_url(&c, &record).await.unwrap();

        let result = cache.get_url(&c).await.unwrap();
        assert_eq!(result, Some(record));
    }

    #[tokio::test]
    async fn set_replaces_previous_entry() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");
        let mut record = test_record("abc123", "https://example.com");

        cache.set_url(&c, &record).await.unwrap();
        record.click_count = 7;
        cache.set_url(&c, &record).await.unwrap();

        assert_eq!(cache.get_url(&c).await.unwrap().unwrap().click_count, 7);
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");
        let record = test_record("abc123", "https://example.com");

        cache.set_url(&c, &record).await.unwrap();
        assert!(cache.get_url(&c).await.unwrap().is_some());

        cache.invalidate(&c).await.unwrap();

        assert!(cache.get_url(&c).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let cache = MokaUrlCache::new();
        let c = code("abc123");

        cache.invalidate(&c).await.unwrap();
        assert!(cache.get_url(&c).await.unwrap().is_none());
        cache.invalidate(&c).await.unwrap();
    }

    #[tokio::test]
    async fn cache_with_ttl_expires() {
        let cache = MokaUrlCache::with_ttl(100, Duration::from_millis(50));
        let c = code("abc123");
        let record = test_record("abc123", "https://example.com");

        cache.set_url(&c, &record).await.unwrap();
        assert!(cache.get_url(&c).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.get_url(&c).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cache_builder_pattern() {
        let cache: MokaUrlCache = MokaUrlCache::builder()
            .max_capacity(1000)
            .ttl(Duration::from_secs(60))
            .tti(Duration::from_secs(30))
            .build()
            .into();

        let c = code("abc123");
        let record = test_record("abc123", "https://example.com");

        cache.set_url(&c, &record).await.unwrap();
        assert!(cache.get_url(&c).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn cache_handles_many_entries() {
        let cache = MokaUrlCache::with_capacity(100);

        for i in 0..50 {
            let c = format!("code{}", i);
            let record = test_record(&c, &format!("https://example{}", i));
            cache.set_url(&code(&c), &record).await.unwrap();
        }

        assert_eq!(
            cache.get_url(&code("code0")).await.unwrap().unwrap().original_url,
            "https://example0"
        );
        assert_eq!(
            cache.get_url(&code("code25")).await.unwrap().unwrap().original_url,
            "https://example25"
        );
        assert!(cache.get_url(&code("code49")).await.unwrap().is_some());
    }
}
