//! JWT Token Service
//!
//! Handles JWT creation, validation, and claims management for user authentication.
//! Tokens are stateless: validity is signature plus expiry, nothing is stored.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthUser;

const ISSUER: &str = "activos-server";

/// Lifetime of an access token. There is no refresh; clients log in again.
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// User id in the `usuario` table
    pub id: i32,
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issuer
    pub iss: String,
}

/// JWT Service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service with the provided secret
    pub fn new(secret: &str) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
            ttl: Duration::minutes(TOKEN_TTL_MINUTES),
        }
    }

    /// Generate a JWT token for a user
    pub fn create_token(&self, user: &AuthUser) -> Result<String> {
        let now = Utc::now();
        let expiration = now + self.ttl;

        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            iss: ISSUER.to_string(),
        };

        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key).context("Failed to encode JWT token")
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .context("Failed to validate JWT token")
    }

    /// Validate a token and return its claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims> {
        let token_data = self.validate_token(token)?;
        Ok(token_data.claims)
    }
}
