// # Routes Module
//
// HTTP route handlers, grouped by resource. Each submodule exposes a
// `create_routes`-style constructor that `server::build_router` merges.

/// Liveness and readiness endpoints
pub mod health;

/// Login and logout
pub mod auth;

/// Asset registration, lookup and lifecycle
pub mod activos;

/// Incident reports
pub mod incidencias;
