//! Auth routes for login and logout

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};

use crate::auth::AuthError;
use crate::auth::models::{AuthResponse, LoginRequest};
use crate::server::AppState;

/// `POST /login`
///
/// Answers `200 {success, message, token}` on success. Missing fields give
/// 400, bad credentials 401 and store trouble 500, all as
/// `{success: false, message}`.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!("Malformed login body: {}", e.body_text());
        AuthError::InvalidRequest
    })?;

    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    tracing::info!("Login attempt for username={}", username);

    let session = state.auth.authenticate(&username, &password).await?;
    tracing::info!(
        "✅ Login exitoso para usuario id={} admin={}",
        session.user.id,
        session.user.is_admin
    );

    Ok(Json(AuthResponse::ok("Login exitoso", Some(session.token))))
}

/// `GET /logout`
///
/// Tokens are stateless, so there is nothing to revoke; the client drops it.
pub async fn logout() -> Json<AuthResponse> {
    Json(AuthResponse::ok(
        "Sesión cerrada (elimine el token en el cliente)",
        None,
    ))
}

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout))
}
