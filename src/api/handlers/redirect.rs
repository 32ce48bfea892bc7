//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /url/shortUrl/{code}`
///
/// # Response
///
/// `302 Found` with `Location` set to the stored URL, byte for byte.
///
/// # Errors
///
/// Returns `404 Not Found` if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let record = state.url_service.resolve(&code).await?;

    let location = HeaderValue::from_str(&record.original_url).map_err(|_| {
        tracing::error!(code = %code, "Stored URL is not a valid header value");
        AppError::internal("Stored URL cannot be redirected to", json!({ "code": code }))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
