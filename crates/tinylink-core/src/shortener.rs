use crate::shortcode::ShortCode;
use crate::store::UrlRecord;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// The operations a transport boundary can invoke.
///
/// Every operation takes the caller's [`CancellationToken`]. Once it fires,
/// the in-flight store or cache call is abandoned and the operation returns
/// [`ShortenerError::Cancelled`](crate::error::ShortenerError::Cancelled).
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates (or returns the existing) record for `original_url`.
    async fn create_short_url(
        &self,
        original_url: &str,
        cancel: &CancellationToken,
    ) -> Result<UrlRecord>;

    /// Resolves a short code to its stored URL record.
    async fn get_original_url(
        &self,
        code: &ShortCode,
        cancel: &CancellationToken,
    ) -> Result<UrlRecord>;

    /// Records one click on `code`.
    async fn increment_clicks(&self, code: &ShortCode, cancel: &CancellationToken) -> Result<()>;

    /// Resolves `code` and records the click, as a redirect does.
    async fn visit(&self, code: &ShortCode, cancel: &CancellationToken) -> Result<UrlRecord>;
}
