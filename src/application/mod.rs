//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the operations HTTP
//! handlers call. They never touch SQL or HTTP types directly.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, sessions, verification and password reset
//! - [`services::user_service::UserService`] - Profile updates, password change, account deletion
//! - [`services::url_service::UrlService`] - Short URL creation, lookup and listing
//! - [`services::token_service::TokenService`] - JWT issuing/verification and token digests
//! - [`services::notifier::Notifier`] - Templated account emails

pub mod services;
