//! Utility functions shared across the application:
//!
//! - [`code_generator`] - Short code generation
//! - [`password`] - bcrypt password hashing
//! - [`qr`] - QR code rendering
//! - [`url_validator`] - Validation of URLs submitted for shortening

pub mod code_generator;
pub mod password;
pub mod qr;
pub mod url_validator;
