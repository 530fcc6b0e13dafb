//! Configuration module for environment variables and application settings

use anyhow::{Context, Result, anyhow};
use std::env;

use crate::database::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign session tokens. Required, there is no fallback.
    pub jwt_secret: String,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Server configuration
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET")
            .ok_or_else(|| anyhow!("JWT_SECRET environment variable is required"))?;

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("Invalid DATABASE_MAX_CONNECTIONS: {}", raw))?,
            None => 16,
        };
        let tls = match var("DATABASE_TLS") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("Invalid DATABASE_TLS: {}", raw))?,
            None => false,
        };
        let database = DatabaseConfig::from_url(&database_url)?
            .with_max_size(max_connections)
            .with_tls(tls);

        // PORT wins so platform-assigned ports keep working
        let port = match var("PORT").or_else(|| var("SERVER_PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid port: {}", raw))?,
            None => 3000,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default();

        Ok(Self {
            jwt_secret,
            database,
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                cors_allowed_origins,
            },
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
