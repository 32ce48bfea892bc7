//! Mailer that logs messages instead of sending them.

use super::service::{MailResult, Mailer, OutgoingMail};
use async_trait::async_trait;
use tracing::{debug, info};

/// A mailer that only writes to the log.
///
/// Used when `SMTP_HOST` is not configured, e.g. in local development.
pub struct LogMailer;

impl LogMailer {
    /// Creates a new LogMailer instance.
    pub fn new() -> Self {
        debug!("Using LogMailer (SMTP delivery disabled)");
        Self
    }
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> MailResult<()> {
        info!(to = %mail.to, subject = %mail.subject, "Email not sent (SMTP disabled)");
        debug!(body = %mail.html, "Suppressed email body");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
