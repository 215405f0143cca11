/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 *   - db: in-memory store, auth: request authenticator, tokens: token issuer
 * - Clone is expected to be cheap (Arc/Clone inside)
 */
use std::sync::Arc;

use crate::repos::Db;
use crate::services::auth::{Authenticator, TokenIssuer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Db,
    pub auth: Arc<Authenticator>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(db: Db, auth: Arc<Authenticator>, tokens: Arc<TokenIssuer>) -> Self {
        Self { db, auth, tokens }
    }
}
