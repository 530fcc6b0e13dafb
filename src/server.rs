//! # Server Module
//!
//! HTTP server setup and route configuration for the asset-management API.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthService, JwtService};
use crate::config::{Config, ServerConfig};
use crate::database::{AssetStore, DatabaseConnection, IncidentStore, StoreHealth};
use crate::routes;
use crate::services::batch::BatchRegistrar;

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub registrar: Arc<BatchRegistrar>,
    pub assets: Arc<dyn AssetStore>,
    pub incidents: Arc<dyn IncidentStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wire every service to one store implementation
    pub fn new<S>(store: Arc<S>, jwt_service: Arc<JwtService>) -> Self
    where
        S: crate::database::CredentialStore + AssetStore + IncidentStore + StoreHealth + 'static,
    {
        Self {
            auth: Arc::new(AuthService::new(store.clone(), jwt_service)),
            registrar: Arc::new(BatchRegistrar::new(store.clone())),
            assets: store.clone(),
            incidents: store.clone(),
            health: store,
        }
    }

    /// Cap the concurrent store calls of one batch registration
    pub fn with_batch_limit(mut self, max_in_flight: usize) -> Self {
        self.registrar = Arc::new(
            BatchRegistrar::new(self.assets.clone()).with_max_in_flight(max_in_flight),
        );
        self
    }
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let origin = if config.cors_allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = config
            .cors_allowed_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]))
}

/// Build the application router with every route group merged in.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(routes::health::ping))
        .route("/health", get(routes::health::health))
        .merge(routes::auth::create_auth_routes())
        .merge(routes::activos::create_routes())
        .merge(routes::incidencias::create_routes())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("🛑 Shutdown signal received, draining connections");
}

/// Starts the HTTP server.
///
/// Connects to the database, wires the services and serves until a shutdown
/// signal arrives.
pub async fn start(config: Config) -> Result<()> {
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret));
    let db = Arc::new(DatabaseConnection::new(config.database.clone()).await?);

    let state = AppState::new(db, jwt_service).with_batch_limit(config.database.max_size);
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server)?),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("🚀 Activos server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}
