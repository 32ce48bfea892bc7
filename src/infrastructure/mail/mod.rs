//! Outgoing email delivery.
//!
//! Provides a [`Mailer`] trait with two implementations:
//! - [`SmtpMailer`] - Production SMTP delivery
//! - [`LogMailer`] - Log-only implementation for development/disabled mail

mod log_mailer;
mod service;
mod smtp_mailer;

pub use log_mailer::LogMailer;
pub use service::{MailError, MailResult, Mailer, OutgoingMail};
pub use smtp_mailer::SmtpMailer;

#[cfg(test)]
pub use service::MockMailer;
