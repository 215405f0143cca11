//! Request authentication in two stages.
//!
//! 1. `AccessTokenVerifier` checks signature, structure and expiry and turns
//!    `sub` into a user id.
//! 2. A `TokenValidatedHook` looks at application state and may still reject a
//!    token that is cryptographically fine (e.g. the user was deleted).
//!
//! `Authenticator` runs them in that order and stops at the first failure.

use std::sync::Arc;

use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::access_jwt::{AccessJwtError, AccessTokenVerifier, VerifiedAccessToken};

/// The minimal view of a user the authenticator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub username: String,
}

/// Read-only user lookup. Called once per authenticated request, possibly
/// from many requests at the same time.
pub trait UserLookup: Send + Sync {
    fn lookup_by_id(&self, id: i64) -> Result<Option<Account>, RepoError>;
}

impl<L: UserLookup + ?Sized> UserLookup for Arc<L> {
    fn lookup_by_id(&self, id: i64) -> Result<Option<Account>, RepoError> {
        (**self).lookup_by_id(id)
    }
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub jti: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("Unauthorized: subject {0} does not resolve to an account")]
    UnknownSubject(i64),
    #[error("user lookup unavailable")]
    LookupUnavailable(#[source] RepoError),
}

impl AuthError {
    /// Everything except a broken lookup is the caller's fault (401).
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::LookupUnavailable(_))
    }
}

impl From<AccessJwtError> for AuthError {
    fn from(e: AccessJwtError) -> Self {
        match e {
            AccessJwtError::InvalidSignature => Self::InvalidSignature,
            AccessJwtError::Expired => Self::Expired,
            AccessJwtError::InvalidSubject => Self::MalformedToken("sub is not a user id".into()),
            AccessJwtError::Malformed(e) => Self::MalformedToken(e.to_string()),
        }
    }
}

/// Runs after the token itself has been accepted.
pub trait TokenValidatedHook: Send + Sync {
    fn on_token_validated(&self, token: &VerifiedAccessToken) -> Result<Principal, AuthError>;
}

/// Rejects tokens whose subject no longer has an account.
pub struct AccountMustExist<L> {
    users: L,
}

impl<L> AccountMustExist<L> {
    pub fn new(users: L) -> Self {
        Self { users }
    }
}

impl<L: UserLookup> TokenValidatedHook for AccountMustExist<L> {
    fn on_token_validated(&self, token: &VerifiedAccessToken) -> Result<Principal, AuthError> {
        let account = self
            .users
            .lookup_by_id(token.user_id)
            .map_err(AuthError::LookupUnavailable)?
            .ok_or(AuthError::UnknownSubject(token.user_id))?;

        Ok(Principal {
            user_id: account.id,
            username: account.username,
            jti: token.jti.clone(),
        })
    }
}

pub struct Authenticator {
    verifier: AccessTokenVerifier,
    hook: Arc<dyn TokenValidatedHook>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(verifier: AccessTokenVerifier, hook: Arc<dyn TokenValidatedHook>) -> Self {
        Self { verifier, hook }
    }

    /// Authenticate from the raw `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = bearer_token(authorization)?;
        let verified = self.verifier.verify(token)?;
        self.hook.on_token_validated(&verified)
    }
}

/// Pull the token out of `Bearer <token>`. The scheme is case-insensitive.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let value = authorization
        .ok_or_else(|| AuthError::MalformedToken("missing authorization header".into()))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::MalformedToken("expected a bearer token".into()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedToken("expected a bearer token".into()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedToken("empty bearer token".into()));
    }
    Ok(token)
}
