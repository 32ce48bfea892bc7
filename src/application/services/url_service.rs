//! Short URL creation and resolution.

use serde_json::json;
use std::sync::Arc;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;

use crate::domain::entities::{NewUrl, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_well_formed};
use crate::utils::qr::render_data_url;
use crate::utils::url_validator::validate_target_url;

/// Insert attempts before a run of short code collisions is reported as a failure.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Service for creating and resolving short URLs.
///
/// Codes are random, so uniqueness is left to the `urls_short_code_key`
/// constraint: a collision surfaces as [`AppError::Conflict`] from the
/// repository and the insert is retried with a fresh code.
pub struct UrlService<R: UrlRepository + ?Sized> {
    urls: Arc<R>,
    public_base_url: String,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new URL service.
    ///
    /// `public_base_url` is the externally visible origin of this server,
    /// used to build absolute short links.
    pub fn new(urls: Arc<R>, public_base_url: impl Into<String>) -> Self {
        Self {
            urls,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Shortens `original_url` for `user_id`.
    ///
    /// The URL is stored exactly as submitted, together with a QR code of it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute HTTP(S) URL.
    /// Returns [`AppError::Internal`] if QR rendering fails or every attempt
    /// collided with an existing code.
    pub async fn shorten(&self, user_id: i64, original_url: &str) -> Result<UrlRecord, AppError> {
        validate_target_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let qr_code = render_data_url(original_url)?;
        let urls = &self.urls;

        let strategy = FixedInterval::from_millis(0).take(MAX_CODE_ATTEMPTS - 1);

        let result = RetryIf::spawn(
            strategy,
            move || {
                let qr_code = qr_code.clone();
                async move {
                    let new_url = NewUrl {
                        user_id,
                        original_url: original_url.to_string(),
                        short_code: generate_code()?,
                        qr_code: Some(qr_code),
                    };
                    urls.create(new_url).await
                }
            },
            |e: &AppError| {
                if e.is_conflict() {
                    tracing::warn!("Short code collision, retrying with a new code");
                    true
                } else {
                    false
                }
            },
        )
        .await;

        match result {
            Ok(url) => {
                tracing::info!(user_id, code = %url.short_code, "Short URL created");
                Ok(url)
            }
            Err(e) if e.is_conflict() => Err(AppError::internal(
                "Failed to generate unique code",
                json!({ "reason": "Too many collisions", "attempts": MAX_CODE_ATTEMPTS }),
            )),
            Err(e) => Err(e),
        }
    }

    /// Looks up the record a short code points to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record uses `code`.
    pub async fn resolve(&self, code: &str) -> Result<UrlRecord, AppError> {
        let not_found = || AppError::not_found("Short URL not found", json!({ "code": code }));

        if !is_well_formed(code) {
            return Err(not_found());
        }

        self.urls.find_by_code(code).await?.ok_or_else(not_found)
    }

    /// Returns one page of the user's URLs (newest first) and their total count.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<UrlRecord>, i64), AppError> {
        let items = self.urls.list_by_user(user_id, offset, limit).await?;
        let total = self.urls.count_by_user(user_id).await?;
        Ok((items, total))
    }

    /// Absolute redirect URL for a short code.
    pub fn short_link(&self, code: &str) -> String {
        format!("{}/url/shortUrl/{}", self.public_base_url, code)
    }
}
