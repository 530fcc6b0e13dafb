//! # Activos Server
//!
//! REST backend for the IT asset inventory: assets ("activos"), their
//! assignment to employees, incident reports and user logins. Business rules
//! live in database store procedures; this server validates requests,
//! authenticates users and shapes responses.
//!
//! ## Architecture
//! - `server`: router construction, shared state and startup
//! - `config`: environment configuration
//! - `auth`: password verification, JWT issuance and the login flow
//! - `services`: asset normalization and batch registration
//! - `database`: connection pool and store procedure adapters
//! - `routes`: HTTP handlers grouped by resource
//!
//! ## Environment Setup
//! `JWT_SECRET` and `DATABASE_URL` are required; see `config.rs` for the rest.
//! A `.env` file in the working directory is loaded when present.
//!
//! ## Health Check
//! ```bash
//! curl http://localhost:3000/ping
//! ```

mod auth;
mod config;
mod database;
mod errors;
mod routes;
mod server;
mod services;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, real deployments use the environment
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();

    tracing::info!("🏁 Starting Activos Server...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!("🏗️  Build profile: {}", if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    });

    let config = config::Config::from_env().map_err(|e| {
        tracing::error!("❌ Invalid configuration: {:#}", e);
        e
    })?;

    server::start(config).await
}
