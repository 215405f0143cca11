/*
 * Responsibility
 * - URL layout of v1
 * - every route carries an explicit Access tag; Authenticated routes get the
 *   bearer gate, Anonymous ones never see it
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    health::health,
    users::{authenticate, delete_user, get_user, list_users, me, register, update_user},
};
use crate::middleware::auth::Access::{Anonymous, Authenticated};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", Anonymous.guard(get(health), state))
        .route(
            "/users/authenticate",
            Anonymous.guard(post(authenticate), state),
        )
        .route("/users/register", Anonymous.guard(post(register), state))
        .route("/users", Authenticated.guard(get(list_users), state))
        .route("/users/me", Authenticated.guard(get(me), state))
        .route(
            "/users/{id}",
            Authenticated.guard(get(get_user).put(update_user).delete(delete_user), state),
        )
}
