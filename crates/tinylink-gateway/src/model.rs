use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tinylink_core::UrlRecord;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub original_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub click_count: u64,
    pub created_at: Timestamp,
}

impl UrlResponse {
    pub fn new(record: UrlRecord, short_url: String) -> Self {
        Self {
            short_code: record.short_code.into(),
            short_url,
            original_url: record.original_url,
            click_count: record.click_count,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
