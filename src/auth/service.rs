//! Authentication service
//!
//! Orchestrates credential lookup, password verification and token issuance.
//! The credential store and token issuer are injected at construction.

use std::sync::Arc;

use crate::auth::errors::AuthError;
use crate::auth::jwt::JwtService;
use crate::auth::models::AuthUser;
use crate::auth::password::verify_password;
use crate::database::store::CredentialStore;

/// A freshly issued session token and the identity it carries
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt: Arc<JwtService>) -> Self {
        Self { store, jwt }
    }

    /// Look up `username`, verify `password` and issue a token.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidRequest);
        }

        let record = self
            .store
            .find_by_username(username)
            .await
            .map_err(|e| {
                tracing::error!("❌ Error al verificar usuario: {}", e);
                AuthError::ServiceUnavailable(e.to_string())
            })?
            .ok_or_else(|| {
                tracing::info!("Login rejected for unknown user");
                AuthError::InvalidCredentials
            })?;

        // hashing is CPU-bound, run it on the blocking pool
        let candidate = password.to_string();
        let stored_hash = record.password_hash.clone();
        let matched = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
            .await
            .map_err(|e| AuthError::ServiceUnavailable(format!("password check aborted: {}", e)))?;

        if !matched {
            tracing::info!("Login rejected for user id={}", record.id);
            return Err(AuthError::InvalidCredentials);
        }

        let user = AuthUser::from(&record);
        let token = self.jwt.create_token(&user).map_err(|e| {
            tracing::error!("❌ Error al generar token: {}", e);
            AuthError::TokenIssuance(e.to_string())
        })?;

        Ok(Session { token, user })
    }
}
