use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The short code assigned to the URL. Never changes.
    pub short_code: ShortCode,
    /// The original URL that was shortened. Never changes.
    pub original_url: String,
    /// How many times the short code has been visited.
    pub click_count: u64,
    /// When the record was created.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Creates a fresh record with a zero click count, stamped with the current time.
    ///
    /// The timestamp is truncated to millisecond precision, the resolution
    /// every store persists.
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            short_code,
            original_url: original_url.into(),
            click_count: 0,
            created_at: Timestamp::from_millisecond(now.as_millisecond()).unwrap_or(now),
        }
    }
}

/// The result of [`UrlStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was written.
    Inserted,
    /// Another record already owns the short code.
    CodeTaken,
    /// A record for the same original URL already exists (under any code).
    UrlExists,
}

/// The result of [`UrlStore::increment_clicks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// The counter was bumped; carries the value after the increment.
    Incremented { click_count: u64 },
    /// No record exists for the short code. Nothing was written.
    NotFound,
}

/// Durable storage for [`UrlRecord`]s.
///
/// # Contract
///
/// * `insert_if_absent` checks and writes in a single atomic step: of any
///   number of concurrent inserts sharing a short code *or* an original URL,
///   at most one returns [`InsertOutcome::Inserted`]. Callers rely on this
///   and take no locks of their own.
/// * `increment_clicks` is atomic at the store level: concurrent increments
///   for the same code are all reflected in `click_count`.
/// * Records are never rewritten. `short_code`, `original_url` and
///   `created_at` stay as inserted; only `click_count` moves, and only up.
#[async_trait]
pub trait UrlStore: Send + Sync + 'static {
    /// Looks a record up by its original URL.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>>;

    /// Inserts the record unless its code or its original URL is already present.
    async fn insert_if_absent(&self, record: &UrlRecord) -> Result<InsertOutcome>;

    /// Looks a record up by short code. Returns `None` if the code does not exist.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Atomically adds one to the record's click count.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<IncrementOutcome>;

    /// Returns the greatest stored code in base62 numeric order: longer codes
    /// rank above shorter ones, equal lengths compare byte by byte.
    ///
    /// Used once at startup to resume a sequence generator.
    async fn max_code(&self) -> Result<Option<ShortCode>>;
}
