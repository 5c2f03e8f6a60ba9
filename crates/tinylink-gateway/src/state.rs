use std::sync::Arc;

use tinylink_core::ShortCode;
use tinylink_shortener::Shortener;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: String,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        public_base_url: impl Into<String>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            shortener,
            base_url: public_base_url.into(),
            shutdown,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// A token that fires when the server shuts down.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    pub fn short_url(&self, code: &ShortCode) -> String {
        code.to_url(&self.base_url)
    }
}
