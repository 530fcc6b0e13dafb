//! # Authentication Module
//!
//! Password verification, JWT issuance and the login flow that ties them to
//! the credential store.

pub mod errors;
pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use jwt::JwtService;
pub use service::AuthService;
