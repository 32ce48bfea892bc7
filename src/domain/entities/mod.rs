//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without I/O.
//!
//! # Entity Types
//!
//! - [`User`] - A registered account
//! - [`UrlRecord`] - A shortened URL owned by a user
//!
//! # Design Pattern
//!
//! Separate structs are used for creation and updates:
//! - `NewUser`, `NewUrl` - For creating new records
//! - `UserPatch` - For partial profile updates

pub mod url;
pub mod user;

pub use url::{NewUrl, UrlRecord};
pub use user::{NewUser, User, UserPatch};
