//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, Notifier, TokenService, UrlService, UserService};
use crate::config::Config;
use crate::domain::repositories::{UrlRepository, UserRepository};
use crate::infrastructure::mail::Mailer;
use crate::utils::password::PasswordHasher;

/// Application state shared across all request handlers.
///
/// Services are built over trait objects so the same router runs against
/// PostgreSQL in production and in-memory repositories in tests.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<dyn UserRepository>>,
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub url_service: Arc<UrlService<dyn UrlRepository>>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    /// Wires services from repositories, a mailer and the loaded configuration.
    pub fn new(
        users: Arc<dyn UserRepository>,
        urls: Arc<dyn UrlRepository>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(
            config.token_secrets.clone(),
            config.access_token_ttl_seconds,
            config.refresh_token_ttl_seconds,
        ));
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let notifier = Arc::new(Notifier::new(mailer, config.frontend_url.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                tokens,
                hasher,
                notifier.clone(),
            )),
            user_service: Arc::new(UserService::new(users, hasher, notifier.clone())),
            url_service: Arc::new(UrlService::new(urls, config.public_base_url.clone())),
            notifier,
        }
    }
}
