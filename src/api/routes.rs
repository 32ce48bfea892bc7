//! API route configuration.
//!
//! Routes are grouped by how they are protected; [`crate::routes::app_router`]
//! attaches the authentication and rate limiting layers to each group.

use crate::api::handlers::{
    change_password_handler, delete_account_handler, login_handler, logout_handler,
    my_urls_handler, refresh_token_handler, register_handler, request_password_reset_handler,
    reset_password_handler, shorten_handler, update_profile_handler, verify_email_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

/// Public routes that handle credentials or one-time tokens.
///
/// # Endpoints
///
/// - `POST       /auth/register`               - Create an account
/// - `GET|POST   /auth/verify-email/{token}`   - Verify an email address
/// - `POST       /auth/login`                  - Obtain access and refresh tokens
/// - `POST       /auth/refresh-token`          - Obtain a new access token
/// - `POST       /auth/request-password-reset` - Email a reset link
/// - `PATCH      /auth/reset-password`         - Set a new password with a reset token
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route(
            "/auth/verify-email/{token}",
            get(verify_email_handler).post(verify_email_handler),
        )
        .route("/auth/login", post(login_handler))
        .route("/auth/refresh-token", post(refresh_token_handler))
        .route(
            "/auth/request-password-reset",
            post(request_password_reset_handler),
        )
        .route("/auth/reset-password", patch(reset_password_handler))
}

/// Routes that require an access token.
///
/// # Endpoints
///
/// - `POST   /auth/logout`          - End the session
/// - `PATCH  /user/profile`         - Update name/email
/// - `PATCH  /user/change-password` - Change password
/// - `DELETE /user/delete-account`  - Delete the account and its URLs
/// - `POST   /url/shorten-url`      - Create a short URL
/// - `GET    /url/my-urls`          - List own short URLs
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route("/user/profile", patch(update_profile_handler))
        .route("/user/change-password", patch(change_password_handler))
        .route("/user/delete-account", delete(delete_account_handler))
        .route("/url/shorten-url", post(shorten_handler))
        .route("/url/my-urls", get(my_urls_handler))
}
