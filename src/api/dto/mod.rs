//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde with `camelCase` field names and validator for input
//! bounds. Semantic checks (blank fields, email format, password strength)
//! live in the services so every caller gets them.

pub mod auth;
pub mod health;
pub mod message;
pub mod pagination;
pub mod url;
pub mod user;
