//! Password hashing via bcrypt.
//!
//! The digest is a standard bcrypt string (`$2b$10$...`), which carries its
//! own salt and cost, so nothing besides the digest needs to be stored.

use std::sync::LazyLock;

use thiserror::Error;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Stand-in digest checked when there is no stored one, so a login for an
/// unknown account does the same bcrypt work as a wrong password.
static DUMMY_DIGEST: LazyLock<String> =
    LazyLock::new(|| bcrypt::hash("chirpy-dummy-password", BCRYPT_COST).unwrap_or_default());

#[derive(Debug, Error)]
pub enum PasswordError {
    /// The password does not match the digest.
    #[error("password does not match")]
    Mismatch,

    /// bcrypt itself failed (bad digest, RNG failure).
    #[error("bcrypt: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// The blocking hashing task panicked or was cancelled.
    #[error("hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a password with bcrypt.
///
/// Empty passwords hash like any other input; reject them before calling.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

/// Verify a password against a bcrypt digest.
pub fn verify_password(password: &str, digest: &str) -> Result<(), PasswordError> {
    if bcrypt::verify(password, digest)? {
        Ok(())
    } else {
        Err(PasswordError::Mismatch)
    }
}

/// Hash on the blocking pool so the runtime keeps serving other requests.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// Verify on the blocking pool.
pub async fn verify_password_blocking(
    password: String,
    digest: String,
) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &digest)).await?
}

/// Verify against a stored digest that may not exist.
///
/// A missing digest still runs a full bcrypt check against a dummy digest
/// and then reports `Mismatch`.
pub async fn verify_stored_password(
    password: String,
    digest: Option<String>,
) -> Result<(), PasswordError> {
    match digest {
        Some(digest) => verify_password_blocking(password, digest).await,
        None => {
            tokio::task::spawn_blocking(move || {
                let _ = verify_password(&password, &DUMMY_DIGEST);
            })
            .await?;
            Err(PasswordError::Mismatch)
        }
    }
}
