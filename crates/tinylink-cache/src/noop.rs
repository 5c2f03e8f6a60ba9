use async_trait::async_trait;
use tinylink_core::cache::Result;
use tinylink_core::{ShortCode, UrlCache, UrlRecord};

/// A cache that stores nothing.
///
/// Every lookup misses and every write succeeds, so the shortener runs
/// against the store alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl UrlCache for NoopCache {
    async fn get_url(&self, _code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(None)
    }

    async fn set_url(&self, _code: &ShortCode, _record: &UrlRecord) -> Result<()> {
        Ok(())
    }

    async fn invalidate(&self, _code: &ShortCode) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_misses() {
        let cache = NoopCache;
        let code = ShortCode::new_unchecked("abc123");
        let record = UrlRecord::new(code.clone(), "https://example.com");

        cache.set_url(&code, &record).await.unwrap();
        assert!(cache.get_url(&code).await.unwrap().is_none());
        cache.invalidate(&code).await.unwrap();
    }
}
