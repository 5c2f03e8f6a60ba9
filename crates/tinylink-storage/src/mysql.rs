use async_trait::async_trait;
use jiff::Timestamp;
use sha2::{Digest, Sha256};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tinylink_core::store::{IncrementOutcome, InsertOutcome, Result, UrlRecord, UrlStore};
use tinylink_core::{ShortCode, StorageError};
use tracing::{debug, trace};

/// DDL for the `short_urls` table used by [`MySqlStore`].
pub const SCHEMA: &str = include_str!("../ddl/mysql/short_urls.sql");

const URL_DIGEST_KEY: &str = "uk_url_digest";

/// MySQL implementation of the store contract.
///
/// Uniqueness lives in the schema: `uk_short_code` guards codes and
/// `uk_url_digest` (the SHA-256 of the original URL) guards idempotent
/// creation. Click counts are bumped with a single `UPDATE`, so concurrent
/// increments never race.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_urls` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn url_digest(original_url: &str) -> Vec<u8> {
    Sha256::digest(original_url.as_bytes()).to_vec()
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", millis))
    })
}

fn decode_row(row: &MySqlRow) -> Result<UrlRecord> {
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let click_count: u64 = row.try_get("click_count").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        short_code: ShortCode::new_unchecked(short_code),
        original_url,
        click_count,
        created_at: parse_created_at(created_at)?,
    })
}

fn unique_violation_key(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| db.message().to_string())
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl UrlStore for MySqlStore {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, original_url, click_count, created_at
            FROM short_urls
            WHERE url_digest = ?
            LIMIT 1
            "#,
        )
        .bind(url_digest(original_url))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(decode_row).transpose()
    }

    async fn insert_if_absent(&self, record: &UrlRecord) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, original_url, url_digest, click_count, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.short_code.as_str())
        .bind(record.original_url.as_str())
        .bind(url_digest(&record.original_url))
        .bind(record.click_count)
        .bind(record.created_at.as_millisecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                trace!(code = %record.short_code, "inserted url record");
                Ok(InsertOutcome::Inserted)
            }
            Err(err) => match unique_violation_key(&err) {
                Some(message) if message.contains(URL_DIGEST_KEY) => {
                    debug!(url = %record.original_url, "insert lost to an existing url");
                    Ok(InsertOutcome::UrlExists)
                }
                Some(_) => {
                    debug!(code = %record.short_code, "insert hit a taken short code");
                    Ok(InsertOutcome::CodeTaken)
                }
                None => Err(map_sqlx_error(err)),
            },
        }
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, original_url, click_count, created_at
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(decode_row).transpose()
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<IncrementOutcome> {
        // LAST_INSERT_ID(expr) hands the post-increment value back on this
        // connection without a second, racy read.
        let result = sqlx::query(
            r#"
            UPDATE short_urls
            SET click_count = LAST_INSERT_ID(click_count + 1)
            WHERE short_code = ?
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Ok(IncrementOutcome::NotFound);
        }

        Ok(IncrementOutcome::Incremented {
            click_count: result.last_insert_id(),
        })
    }

    async fn max_code(&self) -> Result<Option<ShortCode>> {
        // short_code uses ascii_bin, whose byte order matches the base62 alphabet.
        let code: Option<String> = sqlx::query_scalar(
            r#"
            SELECT short_code
            FROM short_urls
            ORDER BY CHAR_LENGTH(short_code) DESC, short_code DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(code.map(ShortCode::new_unchecked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_sha256() {
        let digest = url_digest("https://example.com");
        assert_eq!(digest.len(), 32);
        assert_eq!(digest, url_digest("https://example.com"));
        assert_ne!(digest, url_digest("https://example.com/"));
    }

    #[test]
    fn created_at_round_trips_through_millis() {
        let ts = Timestamp::from_millisecond(1_700_000_000_123).unwrap();
        assert_eq!(parse_created_at(ts.as_millisecond()).unwrap(), ts);
    }

    #[test]
    fn pool_errors_map_to_taxonomy() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StorageError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StorageError::InvalidData(_)
        ));
    }

    #[test]
    fn schema_declares_both_unique_keys() {
        assert!(SCHEMA.contains("uk_short_code"));
        assert!(SCHEMA.contains(URL_DIGEST_KEY));
    }
}
