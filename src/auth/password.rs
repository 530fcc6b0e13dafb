//! Password verification against stored hashes
//!
//! Provisioning writes bcrypt hashes (`$2a$`/`$2b$`/`$2y$`); Argon2 PHC strings
//! are accepted as well. Both comparisons are constant-time in their crates.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

/// Check a plaintext candidate against a stored hash.
///
/// A malformed hash never errors: it is logged and treated as a mismatch.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    if stored_hash.starts_with("$argon2") {
        return match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored argon2 hash is malformed: {}", e);
                false
            }
        };
    }

    match bcrypt::verify(candidate, stored_hash) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}
