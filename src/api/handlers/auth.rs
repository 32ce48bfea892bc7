//! Handlers for registration, sessions and password reset.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{
    AccessTokenResponse, LoginRequest, PasswordResetRequest, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, TokenPairResponse, UserResponse,
};
use crate::api::dto::message::MessageResponse;
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Request Body
///
/// ```json
/// { "name": "alice", "email": "alice@example.com", "password": "s3cret-pass", "avatar": null }
/// ```
///
/// # Response
///
/// `201 Created` with the new account (no password or tokens). A welcome
/// email and a verification email are sent.
///
/// # Errors
///
/// - `400` for blank fields, a malformed email or a short password
/// - `409` if the email or name is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state.auth_service.register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Consumes an email verification token.
///
/// # Endpoint
///
/// `GET|POST /auth/verify-email/{token}`
///
/// # Errors
///
/// Returns `400` if the token is invalid, expired or already used.
pub async fn verify_email_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service.verify_email(&token).await?;

    Ok(Json(MessageResponse::new("Email verified successfully")))
}

/// Exchanges credentials for an access/refresh token pair.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Response
///
/// ```json
/// { "accessToken": "eyJ...", "refreshToken": "eyJ..." }
/// ```
///
/// # Errors
///
/// Returns `401 Invalid credentials` for an unknown email or a wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let pair = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(pair.into()))
}

/// Ends the caller's session.
///
/// # Endpoint
///
/// `POST /auth/logout` (authenticated)
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service.logout(user.id).await?;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// Issues a new access token for the stored refresh token.
///
/// # Endpoint
///
/// `POST /auth/refresh-token`
///
/// # Errors
///
/// Returns `400` if the refresh token is invalid, expired or superseded.
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let access_token = state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// Emails a password reset link.
///
/// # Endpoint
///
/// `POST /auth/request-password-reset`
///
/// # Errors
///
/// - `404` if no account uses the email
/// - `500` if the email could not be sent
pub async fn request_password_reset_handler(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth_service
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password reset email sent successfully.",
    )))
}

/// Sets a new password with a reset token.
///
/// # Endpoint
///
/// `PATCH /auth/reset-password`
///
/// # Request Body
///
/// ```json
/// { "resetToken": "eyJ...", "newPassword": "n3w-pass-word" }
/// ```
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    state
        .auth_service
        .reset_password(&payload.reset_token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password has been reset successfully",
    )))
}
