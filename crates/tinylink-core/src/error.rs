use thiserror::Error;

/// Errors surfaced by [`UrlCache`](crate::UrlCache) implementations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache initialization failed: {0}")]
    Initialization(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by [`UrlStore`](crate::UrlStore) implementations.
///
/// Conflicts are not errors: they are reported through
/// [`InsertOutcome`](crate::store::InsertOutcome).
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned by the [`Shortener`](crate::Shortener) operations.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("no free short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("operation cancelled")]
    Cancelled,
}

/// A coarse, transport-agnostic classification of [`ShortenerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    GenerationExhausted,
    StoreUnavailable,
    CacheUnavailable,
    Cancelled,
}

impl ErrorKind {
    /// A stable, machine-readable name for the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::GenerationExhausted => "generation_exhausted",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::CacheUnavailable => "cache_unavailable",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ShortenerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShortenerError::Validation(_) => ErrorKind::Validation,
            ShortenerError::NotFound(_) => ErrorKind::NotFound,
            ShortenerError::GenerationExhausted { .. } => ErrorKind::GenerationExhausted,
            ShortenerError::Storage(_) => ErrorKind::StoreUnavailable,
            ShortenerError::Cache(_) => ErrorKind::CacheUnavailable,
            ShortenerError::Cancelled => ErrorKind::Cancelled,
        }
    }
}
