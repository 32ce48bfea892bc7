//! Business logic services for the application layer.

pub mod auth_service;
pub mod notifier;
pub mod token_service;
pub mod url_service;
pub mod user_service;

pub use auth_service::{AuthService, Registration, TokenPair};
pub use notifier::{Notification, Notifier};
pub use token_service::{TokenKind, TokenService};
pub use url_service::UrlService;
pub use user_service::{DeletedAccount, UserService};
