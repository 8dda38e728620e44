//! Salted one-way password hashing (Argon2, PHC string format).
//!
//! The salt is random per call, so hashing the same plaintext twice yields
//! different strings; the salt travels inside the PHC string and `verify`
//! recomputes with it.

use argon2::{
    password_hash::{PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid password hash")]
    InvalidHash,
    #[error("failed to hash password")]
    Hash,
}

/// Hash a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns [`Error::Hash`] if the hasher rejects its inputs.
pub fn hash(plaintext: &str) -> Result<String, Error> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|_| Error::Hash)?;

    let phc = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|_| Error::Hash)?;

    Ok(phc.to_string())
}

/// Check a plaintext password against a stored PHC hash string.
///
/// A mismatch is `Ok(false)`, never an error.
///
/// # Errors
///
/// Returns [`Error::InvalidHash`] only when the stored string is not a
/// parseable PHC hash.
pub fn verify(plaintext: &str, hash_string: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(hash_string).map_err(|_| Error::InvalidHash)?;

    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}
