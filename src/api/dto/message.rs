//! Plain confirmation responses.

use serde::Serialize;

/// `{"message": "..."}` body returned by actions without a payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
