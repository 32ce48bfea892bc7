//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters and `FromRow` row mapping.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts and stored token digests
//! - [`PgUrlRepository`] - Short URL storage and retrieval

pub mod pg_url_repository;
pub mod pg_user_repository;

pub use pg_url_repository::PgUrlRepository;
pub use pg_user_repository::PgUserRepository;
