//! Authentication Models
//!
//! Data structures for authentication requests, responses, and user information.

use serde::{Deserialize, Serialize};

use crate::database::models::CredentialRecord;

/// Identity carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl From<&CredentialRecord> for AuthUser {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            is_admin: record.is_admin,
        }
    }
}

/// Login request payload. Missing fields are treated like empty ones.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body for every `/login` and `/logout` answer
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>, token: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            token,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            token: None,
        }
    }
}
