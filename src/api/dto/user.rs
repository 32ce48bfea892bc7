//! DTOs for profile management.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Name is too long"))]
    pub name: Option<String>,

    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub old_password: String,

    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub message: String,
    pub email: String,
    pub name: String,
}
