//! Url entity representing a shortened URL owned by a user.

use chrono::{DateTime, Utc};

/// A shortened URL record.
///
/// `original_url` is stored exactly as submitted; `qr_code` holds a
/// `data:image/png;base64,...` URL encoding the original URL.
#[derive(Debug, Clone)]
pub struct UrlRecord {
    pub id: i64,
    pub user_id: i64,
    pub original_url: String,
    pub short_code: String,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new short URL.
#[derive(Debug, Clone)]
pub struct NewUrl {
    pub user_id: i64,
    pub original_url: String,
    pub short_code: String,
    pub qr_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_url_creation() {
        let new_url = NewUrl {
            user_id: 7,
            original_url: "https://rust-lang.org".to_string(),
            short_code: "Ab3_x-9Z".to_string(),
            qr_code: None,
        };

        assert_eq!(new_url.user_id, 7);
        assert_eq!(new_url.short_code.len(), 8);
    }
}
