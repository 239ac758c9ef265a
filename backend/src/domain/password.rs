//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings. Unit tests use reduced-cost parameters;
//! every other build uses the `argon2` crate defaults (19 MiB, 2 passes).

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
#[cfg(test)]
use argon2::{Algorithm, Params, Version};
use tracing::warn;

/// Hashing failed inside the `argon2` crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

fn hasher() -> Argon2<'static> {
    #[cfg(test)]
    {
        match Params::new(1024, 1, 1, None) {
            Ok(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            Err(error) => panic!("reduced argon2 params must be valid: {error}"),
        }
    }

    #[cfg(not(test))]
    {
        Argon2::default()
    }
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| PasswordHashError {
            message: error.to_string(),
        })
}

/// Check `password` against a stored PHC string.
///
/// An unparsable stored hash never matches; it is logged because it points
/// at corrupt account data rather than a bad login attempt.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(%error, "stored password hash is not a valid PHC string");
            return false;
        }
    };
    // Parameters come from the PHC string, so any argon2 instance verifies.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
