//! Handler for URL shortening endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::url::{ShortenRequest, UrlResponse};
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL with a QR code.
///
/// # Endpoint
///
/// `POST /url/shorten-url` (authenticated)
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com" }
/// ```
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// {
///   "id": 1,
///   "userId": 7,
///   "originalUrl": "https://example.com",
///   "shortUrl": "Xy3_a-Q9",
///   "shortLink": "http://localhost:3000/url/shortUrl/Xy3_a-Q9",
///   "qrCode": "data:image/png;base64,iVBORw0...",
///   "createdAt": "2026-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns `400` if the URL is not an absolute HTTP(S) URL.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let record = state
        .url_service
        .shorten(user.id, &payload.original_url)
        .await?;

    let short_link = state.url_service.short_link(&record.short_code);

    Ok((
        StatusCode::CREATED,
        Json(UrlResponse::from_record(record, short_link)),
    ))
}
