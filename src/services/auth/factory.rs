//! Factory: build the auth services from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{
    AccessTokenVerifier, AccountMustExist, Authenticator, TokenIssuer, UserLookup,
};

pub fn build_authenticator<L>(config: &AuthConfig, users: L) -> Arc<Authenticator>
where
    L: UserLookup + 'static,
{
    let verifier = AccessTokenVerifier::new(config);
    Arc::new(Authenticator::new(
        verifier,
        Arc::new(AccountMustExist::new(users)),
    ))
}

pub fn build_token_issuer(config: &AuthConfig) -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(config))
}
