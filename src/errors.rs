//! API errors for the asset and incident endpoints.
//!
//! Failures render as `{"error": ...}`; a partially failed batch renders as
//! `{"message": ...}` with its counts. Store error details stay in the logs.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::services::batch::BatchOutcome;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Store failure; the string is the public message
    #[error("{0}")]
    Store(String),

    #[error(
        "Activos procesados: {}. Insertados: {}. Errores: {}",
        .0.total_submitted,
        .0.succeeded_count,
        .0.failed_count
    )]
    PartialFailure(BatchOutcome),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::PartialFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log a store error and replace it with a public message
    pub fn store(public_message: &str) -> impl FnOnce(crate::database::StoreError) -> ApiError + '_ {
        move |e| {
            tracing::error!("❌ {}: {}", public_message, e);
            ApiError::Store(public_message.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError::InvalidRequest("Cuerpo de la solicitud inválido".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::PartialFailure(_) => json!({ "message": self.to_string() }),
            _ => json!({ "error": self.to_string() }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_message_lists_counts() {
        let err = ApiError::PartialFailure(BatchOutcome {
            total_submitted: 2,
            succeeded_count: 1,
            failed_count: 1,
        });
        assert_eq!(err.to_string(), "Activos procesados: 2. Insertados: 1. Errores: 1");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Store("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
