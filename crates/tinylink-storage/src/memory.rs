use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tinylink_core::store::{IncrementOutcome, InsertOutcome, Result, UrlRecord, UrlStore};
use tinylink_core::ShortCode;
use tracing::trace;

/// In-memory implementation of [`UrlStore`] using DashMap.
///
/// DashMap provides better concurrency than `RwLock<HashMap>` because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
///
/// Records live in `by_code`; `by_url` is a unique index from original URL
/// to short code. Inserts lock the `by_url` entry before the `by_code`
/// entry, and nothing else ever holds both, so the pair acts as a single
/// atomic check-and-insert.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    by_code: DashMap<String, UrlRecord>,
    by_url: DashMap<String, String>,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_code: DashMap::with_capacity(capacity),
            by_url: DashMap::with_capacity(capacity),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[async_trait]
impl UrlStore for InMemoryStore {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        // Copy the code out so the index guard is released before the record lookup.
        let Some(code) = self.by_url.get(original_url).map(|code| code.clone()) else {
            return Ok(None);
        };

        Ok(self.by_code.get(&code).map(|record| record.clone()))
    }

    async fn insert_if_absent(&self, record: &UrlRecord) -> Result<InsertOutcome> {
        let url_slot = match self.by_url.entry(record.original_url.clone()) {
            Entry::Occupied(_) => {
                trace!(url = %record.original_url, "original url already stored");
                return Ok(InsertOutcome::UrlExists);
            }
            Entry::Vacant(slot) => slot,
        };

        match self.by_code.entry(record.short_code.as_str().to_owned()) {
            Entry::Occupied(_) => {
                trace!(code = %record.short_code, "short code already taken");
                Ok(InsertOutcome::CodeTaken)
            }
            Entry::Vacant(code_slot) => {
                code_slot.insert(record.clone());
                url_slot.insert(record.short_code.as_str().to_owned());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.by_code.get(code.as_str()).map(|record| record.clone()))
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<IncrementOutcome> {
        // The shard write lock held by `get_mut` makes the bump atomic.
        let Some(mut record) = self.by_code.get_mut(code.as_str()) else {
            return Ok(IncrementOutcome::NotFound);
        };

        record.click_count = record.click_count.saturating_add(1);
        Ok(IncrementOutcome::Incremented {
            click_count: record.click_count,
        })
    }

    async fn max_code(&self) -> Result<Option<ShortCode>> {
        Ok(self
            .by_code
            .iter()
            .map(|entry| entry.key().clone())
            .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(ShortCode::new_unchecked))
    }
}
