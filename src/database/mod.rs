//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres with a deadpool connection pool.
//! Business logic lives in store procedures; this module only knows how to
//! call them and how to shape their rows.

pub mod connection;
pub mod models;
pub mod store;

#[cfg(test)]
pub mod fake;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use store::{AssetStore, CredentialStore, IncidentStore, StoreError, StoreHealth};
