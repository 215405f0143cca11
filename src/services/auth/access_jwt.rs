use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{AuthConfig, MAX_LEEWAY_SECONDS};

// Errors returned by the signature/structure stage.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("malformed token: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid 'sub' (expected integer user id)")]
    InvalidSubject,
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(e),
        }
    }
}

/// Access token (JWT) claims as they arrive on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub jti: Option<String>,
}

/// What the verifier hands to the next stage: signature and expiry are
/// checked, `sub` is already an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub user_id: i64,
    pub expires_at: u64,
    pub jti: Option<String>,
}

/// HS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AccessTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AccessTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AccessTokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // No issuer/audience checks: tokens are only ever minted by this service.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = config.leeway_seconds.min(MAX_LEEWAY_SECONDS);

        Self {
            decoding_key,
            validation,
        }
    }

    // Verify and decode a JWT access token.
    pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify signature/expiry, then promote `sub` to an integer user id.
    ///
    /// This says nothing about whether the user still exists; that is the
    /// job of the post-validation hook.
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims = self.decode(token)?;
        let user_id = parse_sub(&claims.sub).ok_or(AccessJwtError::InvalidSubject)?;

        Ok(VerifiedAccessToken {
            user_id,
            expires_at: claims.exp,
            jti: claims.jti,
        })
    }
}

// Project convention: subject is the decimal user id
fn parse_sub(sub: &str) -> Option<i64> {
    sub.trim().parse::<i64>().ok()
}
