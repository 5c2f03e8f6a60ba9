use async_trait::async_trait;
use tinylink_core::cache::Result;
use tinylink_core::{ShortCode, UrlCache, UrlRecord};
use tracing::{debug, trace};

/// A multi-layer cache that composes two cache implementations.
///
/// L1 is typically a fast, local cache (e.g. [`MokaUrlCache`](crate::MokaUrlCache))
/// and L2 a slower, shared one (e.g. [`RedisUrlCache`](crate::RedisUrlCache)).
///
/// # Operation Strategy
///
/// - **Get**: Try L1 first, if miss try L2. If L2 has the value, populate L1
///   with it.
/// - **Set**: Write to L2, then L1.
/// - **Invalidate**: Remove from L2, then L1.
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
}

impl<L1, L2> LayeredCache<L1, L2> {
    /// Creates a new layered cache with the given L1 and L2 caches.
    pub fn new(l1: L1, l2: L2) -> Self {
        Self { l1, l2 }
    }

    /// Returns a reference to the L1 cache.
    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    /// Returns a reference to the L2 cache.
    pub fn l2(&self) -> &L2 {
        &self.l2
    }

    /// Consumes the layered cache and returns the inner caches.
    pub fn into_inner(self) -> (L1, L2) {
        (self.l1, self.l2)
    }
}

#[async_trait]
impl<L1, L2> UrlCache for LayeredCache<L1, L2>
where
    L1: UrlCache,
    L2: UrlCache,
{
    async fn get_url(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Fetching URL record from layered cache");

        if let Some(record) = self.l1.get_url(code).await? {
            debug!(code = %code, "L1 cache hit");
            return Ok(Some(record));
        }
        trace!(code = %code, "L1 cache miss, trying L2");

        match self.l2.get_url(code).await? {
            Some(record) => {
                debug!(code = %code, "L2 cache hit, backfilling L1");
                self.l1.set_url(code, &record).await?;
                Ok(Some(record))
            }
            None => {
                trace!(code = %code, "L2 cache miss");
                Ok(None)
            }
        }
    }

    async fn set_url(&self, code: &ShortCode, record: &UrlRecord) -> Result<()> {
        trace!(code = %code, "Storing URL record in layered cache");

        self.l2.set_url(code, record).await?;
        debug!(code = %code, "Stored in L2 cache");

        self.l1.set_url(code, record).await?;
        debug!(code = %code, "Stored in L1 cache");

        Ok(())
    }

    async fn invalidate(&self, code: &ShortCode) -> Result<()> {
        trace!(code = %code, "Removing URL record from layered cache");

        // L2 first: a reader that misses L1 afterwards must not backfill
        // it from a stale L2 entry.
        self.l2.invalidate(code).await?;
        debug!(code = %code, "Removed from L2 cache");

        self.l1.invalidate(code).await?;
        debug!(code = %code, "Removed from L1 cache");

        Ok(())
    }
}
