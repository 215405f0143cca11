//! Password hashing with Argon2id.
//!
//! The public functions run Argon2 on tokio's blocking pool.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task::{self, JoinError};

use crate::error::AppError;

// Checked against when the username is unknown, so both paths cost one Argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_blocking("bonbonniere-dummy-password").ok());

/// Hash a password into a PHC string (salt included).
pub async fn hash(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();

    task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(join_failed)?
}

pub async fn verify(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(join_failed)
}

/// Burn the same work as a real `verify`; the answer is always `false`.
pub async fn verify_dummy(password: &str) -> Result<bool, AppError> {
    let password = password.to_owned();

    task::spawn_blocking(move || {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            verify_blocking(&password, dummy);
        }
        false
    })
    .await
    .map_err(join_failed)
}

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            AppError::Internal
        })?;

    Ok(hash.to_string())
}

fn verify_blocking(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn join_failed(e: JoinError) -> AppError {
    tracing::error!(error = %e, "password task failed");
    AppError::Internal
}
