//! DTOs for URL shortening endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ShortenRequest {
    /// The URL to shorten. Must be an absolute HTTP/HTTPS URL.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,
}

/// A stored short URL.
///
/// `shortUrl` is the bare code; `shortLink` is the absolute redirect URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i64,
    pub user_id: i64,
    pub original_url: String,
    pub short_url: String,
    pub short_link: String,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, short_link: String) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            original_url: record.original_url,
            short_url: record.short_code,
            short_link,
            qr_code: record.qr_code,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlListResponse {
    pub items: Vec<UrlResponse>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(page: u32, page_size: u32, total: i64) -> Self {
        let size = i64::from(page_size.max(1));
        Self {
            page,
            page_size,
            total,
            total_pages: (total + size - 1) / size,
        }
    }
}
