//! QR code rendering for shortened URLs.

use base64::Engine as _;
use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::QrCode;
use serde_json::json;
use std::io::Cursor;

use crate::error::AppError;

/// Minimum width/height of rendered QR images in pixels.
const QR_MIN_SIZE: u32 = 256;

/// Renders `content` as a PNG QR code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the content does not fit in a QR code or
/// PNG encoding fails.
pub fn render_png(content: &str) -> Result<Vec<u8>, AppError> {
    let code = QrCode::new(content.as_bytes()).map_err(|e| {
        AppError::internal("Failed to generate QR code", json!({ "reason": e.to_string() }))
    })?;

    let image: ImageBuffer<Luma<u8>, Vec<u8>> = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .build();

    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).map_err(|e| {
        AppError::internal("Failed to encode QR code", json!({ "reason": e.to_string() }))
    })?;

    Ok(buffer.into_inner())
}

/// Renders `content` as a `data:image/png;base64,...` URL.
pub fn render_data_url(content: &str) -> Result<String, AppError> {
    let png = render_png(content)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}
