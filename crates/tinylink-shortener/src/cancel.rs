use std::future::Future;
use tinylink_core::ShortenerError;
use tokio_util::sync::CancellationToken;

/// Drives `fut` until it completes or `cancel` fires, whichever comes first.
///
/// On cancellation `fut` is dropped, aborting the in-flight call. A token
/// that has already fired wins without polling `fut` at all.
pub(crate) async fn cancellable<F>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, ShortenerError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ShortenerError::Cancelled),
        output = fut => Ok(output),
    }
}
