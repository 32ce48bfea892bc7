//! Password hashing with bcrypt.
//!
//! Hashing is CPU-bound, so both operations run on the blocking thread pool.

use serde_json::json;

use crate::error::AppError;

/// bcrypt cost used in production.
pub const DEFAULT_COST: u32 = 12;

/// Hashes and verifies passwords with a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if hashing fails or the worker panics.
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let cost = self.cost;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))?
            .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))
    }

    /// Checks a plaintext password against a stored hash.
    ///
    /// A malformed stored hash is treated as a mismatch and logged.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        let result = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                AppError::internal("Password verification failed", json!({ "reason": e.to_string() }))
            })?;

        match result {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::error!("Stored password hash is unreadable: {}", e);
                Ok(false)
            }
        }
    }
}
