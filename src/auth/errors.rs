//! Authentication errors and their HTTP rendering.
//!
//! Unknown users and wrong passwords share one variant so callers cannot tell
//! them apart.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::models::AuthResponse;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username y contraseña son obligatorios")]
    InvalidRequest,

    #[error("Usuario o contraseña incorrectos")]
    InvalidCredentials,

    #[error("credential store unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("token issuance failed: {0}")]
    TokenIssuance(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidRequest => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::ServiceUnavailable(_) | AuthError::TokenIssuance(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            AuthError::InvalidRequest | AuthError::InvalidCredentials => self.to_string(),
            AuthError::ServiceUnavailable(_) | AuthError::TokenIssuance(_) => {
                "Error en el servidor".to_string()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(AuthResponse::failure(self.public_message()))).into_response()
    }
}
