/*
 * Responsibility
 * - the "authenticated context" type handlers see
 * - the middleware validates and stores it in request extensions; handlers only take this type
 *
 * Notes
 * - token and account checks belong to the middleware/services, not here
 */
use crate::services::auth::Principal;

/// Context attached to an authenticated request.
///
/// - `user_id` is the internal integer user id (the token's `sub`)
/// - `jti` is for audit/correlation only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub username: String,
    pub jti: Option<String>,
}

impl From<Principal> for AuthCtx {
    fn from(p: Principal) -> Self {
        Self {
            user_id: p.user_id,
            username: p.username,
            jti: p.jti,
        }
    }
}
