pub mod access_jwt;
pub mod authenticator;
pub mod factory;
pub mod token_issuer;

pub use access_jwt::{AccessJwtError, AccessTokenVerifier, VerifiedAccessToken};
pub use authenticator::{
    Account, AccountMustExist, AuthError, Authenticator, Principal, TokenValidatedHook,
    UserLookup,
};
pub use factory::{build_authenticator, build_token_issuer};
pub use token_issuer::{IssuedToken, TokenIssuer};
