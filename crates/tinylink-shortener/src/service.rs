use crate::cancel::cancellable;
use crate::config::ShortenerConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tinylink_core::store::{IncrementOutcome, InsertOutcome};
use tinylink_core::{
    ShortCode, Shortener, ShortenerError, StorageError, UrlCache, UrlRecord, UrlStore,
};
use tinylink_generator::{Generator, Seed};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use url::Url;

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`UrlStore`], a [`UrlCache`] and a [`Generator`]:
/// - creates are idempotent per original URL and retry on code collisions,
///   bounded by [`ShortenerConfig::max_attempts`]
/// - reads are cache-aside; only positive results are cached
/// - new records are written through to the cache, click increments
///   invalidate it
///
/// The service keeps no state between calls. All serialization happens in
/// the store (see the [`UrlStore`] contract), so any number of instances may
/// run against one store. Cache failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct ShortenerService<S, C, G> {
    store: Arc<S>,
    cache: Arc<C>,
    generator: Arc<G>,
    config: ShortenerConfig,
}

impl<S, C, G> Clone for ShortenerService<S, C, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            generator: Arc::clone(&self.generator),
            config: self.config.clone(),
        }
    }
}

impl<S: UrlStore, C: UrlCache, G: Generator> ShortenerService<S, C, G> {
    /// Creates a new `ShortenerService` with the default configuration.
    pub fn new(store: S, cache: C, generator: G) -> Self {
        Self::with_config(store, cache, generator, ShortenerConfig::default())
    }

    /// Creates a new `ShortenerService` with a custom configuration.
    pub fn with_config(store: S, cache: C, generator: G, config: ShortenerConfig) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
            generator: Arc::new(generator),
            config,
        }
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Validates that the URL is absolute, uses http(s), and has a host.
    fn validate_url(original_url: &str) -> Result<()> {
        if original_url.trim().is_empty() {
            return Err(ShortenerError::Validation(
                "URL cannot be empty".to_string(),
            ));
        }

        // The URL is stored byte-for-byte, so reject input the parser would silently trim.
        if original_url.trim() != original_url {
            return Err(ShortenerError::Validation(
                "URL must not have leading or trailing whitespace".to_string(),
            ));
        }

        let parsed = Url::parse(original_url).map_err(|e| {
            ShortenerError::Validation(format!("malformed URL '{}': {}", original_url, e))
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::Validation(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ShortenerError::Validation(format!(
                "URL must have a host: {}",
                original_url
            )));
        }

        Ok(())
    }

    /// Reads through the cache; a failing cache counts as a miss.
    async fn cached(
        &self,
        code: &ShortCode,
        cancel: &CancellationToken,
    ) -> Result<Option<UrlRecord>> {
        match cancellable(cancel, self.cache.get_url(code)).await? {
            Ok(hit) => Ok(hit),
            Err(e) => {
                warn!(code = %code, error = %e, "cache read failed, falling back to store");
                Ok(None)
            }
        }
    }

    async fn populate_cache(&self, record: &UrlRecord, cancel: &CancellationToken) -> Result<()> {
        let code = &record.short_code;
        if let Err(e) = cancellable(cancel, self.cache.set_url(code, record)).await? {
            warn!(code = %code, error = %e, "cache write failed, continuing without it");
        }
        Ok(())
    }

    async fn invalidate_cache(&self, code: &ShortCode, cancel: &CancellationToken) -> Result<()> {
        if let Err(e) = cancellable(cancel, self.cache.invalidate(code)).await? {
            warn!(code = %code, error = %e, "cache invalidation failed, entry may stay stale until evicted");
        }
        Ok(())
    }

    async fn existing_for(
        &self,
        original_url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<UrlRecord>> {
        Ok(cancellable(cancel, self.store.find_by_original_url(original_url)).await??)
    }
}

#[async_trait]
impl<S: UrlStore, C: UrlCache, G: Generator> Shortener for ShortenerService<S, C, G> {
    async fn create_short_url(
        &self,
        original_url: &str,
        cancel: &CancellationToken,
    ) -> Result<UrlRecord> {
        Self::validate_url(original_url)?;

        if let Some(existing) = self.existing_for(original_url, cancel).await? {
            debug!(code = %existing.short_code, "url already shortened");
            return Ok(existing);
        }

        let max_attempts = self.max_attempts();
        for attempt in 0..max_attempts {
            let code: ShortCode = self
                .generator
                .generate(&Seed::new(original_url, attempt))
                .into();
            let record = UrlRecord::new(code, original_url);

            match cancellable(cancel, self.store.insert_if_absent(&record)).await?? {
                InsertOutcome::Inserted => {
                    debug!(code = %record.short_code, attempt, "created short url");
                    self.populate_cache(&record, cancel).await?;
                    return Ok(record);
                }
                InsertOutcome::CodeTaken => {
                    debug!(code = %record.short_code, attempt, "short code collision, retrying");
                }
                InsertOutcome::UrlExists => {
                    // A concurrent create for the same URL committed first.
                    debug!(attempt, "lost create race, returning the winner");
                    return self.existing_for(original_url, cancel).await?.ok_or_else(|| {
                        ShortenerError::Storage(StorageError::InvalidData(format!(
                            "store reported '{}' as present but returned no record",
                            original_url
                        )))
                    });
                }
            }
        }

        warn!(attempts = max_attempts, "gave up generating a free short code");
        Err(ShortenerError::GenerationExhausted {
            attempts: max_attempts,
        })
    }

    async fn get_original_url(
        &self,
        code: &ShortCode,
        cancel: &CancellationToken,
    ) -> Result<UrlRecord> {
        trace!(code = %code, "resolving short code");

        if let Some(record) = self.cached(code, cancel).await? {
            trace!(code = %code, "served from cache");
            return Ok(record);
        }

        match cancellable(cancel, self.store.find_by_code(code)).await?? {
            Some(record) => {
                trace!(code = %code, "served from store, populating cache");
                self.populate_cache(&record, cancel).await?;
                Ok(record)
            }
            None => {
                debug!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }

    async fn increment_clicks(&self, code: &ShortCode, cancel: &CancellationToken) -> Result<()> {
        match cancellable(cancel, self.store.increment_clicks(code)).await?? {
            IncrementOutcome::Incremented { click_count } => {
                trace!(code = %code, click_count, "recorded click");
                self.invalidate_cache(code, cancel).await
            }
            IncrementOutcome::NotFound => {
                debug!(code = %code, "click on unknown short code");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }

    async fn visit(&self, code: &ShortCode, cancel: &CancellationToken) -> Result<UrlRecord> {
        let record = self.get_original_url(code, cancel).await?;
        self.increment_clicks(code, cancel).await?;
        Ok(record)
    }
}
