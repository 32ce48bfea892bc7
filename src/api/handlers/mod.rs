//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod profile;
pub mod redirect;
pub mod shorten;
pub mod urls;

pub use auth::{
    login_handler, logout_handler, refresh_token_handler, register_handler,
    request_password_reset_handler, reset_password_handler, verify_email_handler,
};
pub use health::health_handler;
pub use profile::{change_password_handler, delete_account_handler, update_profile_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use urls::my_urls_handler;
