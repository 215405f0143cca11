use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct AccessTokenClaims {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

/// Signs HS256 access tokens with the shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            ttl_seconds: config.access_token_ttl_seconds,
        }
    }

    /// Issue an access token whose `sub` is the decimal user id.
    pub fn issue_access_token(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl_seconds).map_err(|_| AppError::Internal)?;

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.checked_add(ttl).ok_or(AppError::Internal)?,
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let access_token =
            jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
                error!(error = %e, "failed to sign JWT");
                AppError::Internal
            })?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::access_jwt::AccessTokenVerifier;

    #[test]
    fn overflowing_lifetime_is_an_error() {
        let config = AuthConfig {
            access_token_ttl_seconds: i64::MAX as u64,
            ..config("s3cr3t")
        };

        assert!(matches!(
            TokenIssuer::new(&config).issue_access_token(7),
            Err(AppError::Internal)
        ));
    }

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            secret: secret.into(),
            access_token_ttl_seconds: 900,
            leeway_seconds: 0,
        }
    }

    #[test]
    fn issued_tokens_verify_with_the_same_secret_only() {
        let issued = TokenIssuer::new(&config("s3cr3t"))
            .issue_access_token(7)
            .unwrap();
        assert_eq!(issued.expires_in, 900);

        let claims = AccessTokenVerifier::new(&config("s3cr3t"))
            .decode(&issued.access_token)
            .unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.exp - claims.iat.unwrap(), 900);
        assert!(claims.jti.is_some());

        assert!(
            AccessTokenVerifier::new(&config("other"))
                .verify(&issued.access_token)
                .is_err()
        );
    }
}
