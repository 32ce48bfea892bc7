//! Handlers for the authenticated user's own account.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::auth::UserResponse;
use crate::api::dto::message::MessageResponse;
use crate::api::dto::user::{ChangePasswordRequest, DeleteAccountResponse, UpdateProfileRequest};
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Updates name and/or email.
///
/// # Endpoint
///
/// `PATCH /user/profile`
///
/// Absent or blank fields keep their current value.
///
/// # Errors
///
/// - `400` for a malformed email
/// - `409` if the email belongs to another account
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .user_service
        .update_profile(user.id, payload.name, payload.email)
        .await?;

    Ok(Json(updated.into()))
}

/// Changes the password after checking the current one.
///
/// # Endpoint
///
/// `PATCH /user/change-password`
///
/// # Errors
///
/// Returns `400 Incorrect old password` on mismatch.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .user_service
        .change_password(user.id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Deletes the account and all of its short URLs.
///
/// # Endpoint
///
/// `DELETE /user/delete-account`
///
/// # Response
///
/// ```json
/// { "message": "User account deleted successfully", "email": "alice@example.com", "name": "alice" }
/// ```
pub async fn delete_account_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<DeleteAccountResponse>, AppError> {
    let deleted = state.user_service.delete_account(user.id).await?;

    Ok(Json(DeleteAccountResponse {
        message: "User account deleted successfully".to_string(),
        email: deleted.email,
        name: deleted.name,
    }))
}
