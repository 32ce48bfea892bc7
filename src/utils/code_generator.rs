//! Random short codes: 48 bits from the OS RNG, rendered as 8 URL-safe
//! base64 characters.

use base64::Engine as _;
use serde_json::json;

use crate::error::AppError;

/// Raw entropy per code. Six bytes encode to eight characters with no padding.
const ENTROPY_BYTES: usize = 6;

pub const CODE_LENGTH: usize = 8;

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Draws a fresh code. Uniqueness is not checked here; the caller retries
/// when the store reports a collision.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the operating system cannot supply
/// random bytes.
pub fn generate_code() -> Result<String, AppError> {
    let mut entropy = [0u8; ENTROPY_BYTES];
    fill_random(&mut entropy)?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(entropy))
}

/// Fills `buf` from the OS RNG, mapping failure to a 500.
pub fn fill_random(buf: &mut [u8]) -> Result<(), AppError> {
    getrandom::fill(buf).map_err(|e| {
        tracing::error!("OS random source failed: {}", e);
        AppError::internal("Random source unavailable", json!({}))
    })
}

/// Cheap shape check so malformed lookups never reach the database.
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(is_code_char)
}
