use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_shortener::{ErrorKind, ShortenerError};
use tracing::{debug, error};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(ShortenerError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind())
    }
}

/// Maps each error kind onto the HTTP status returned to clients.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::GenerationExhausted => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::StoreUnavailable
        | ErrorKind::CacheUnavailable
        | ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        AppError(error)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(ShortenerError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.0.kind();

        if status.is_server_error() {
            error!(kind = %kind, error = %self.0, "request failed");
        } else {
            debug!(kind = %kind, error = %self.0, "request rejected");
        }

        let body = ErrorResponse {
            error: kind.as_str().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
