//! Bearer access-token gate: verify the token, confirm the account still
//! exists, put `AuthCtx` into the request extensions.
//!
//! Which routes go through the gate is decided when the router is built, by
//! tagging each route with an `Access` value (see `api::v1::routes`).

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Per-route authentication requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token needed, the gate is not installed at all.
    Anonymous,
    Authenticated,
}

impl Access {
    /// Wrap a method router with the gate when the route requires it.
    ///
    /// ```ignore
    /// .route("/users", Access::Authenticated.guard(get(list_users), &state))
    /// ```
    pub fn guard(self, route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
        match self {
            Self::Anonymous => route,
            // from_fn in axum 0.8 cannot take a State extractor, hence from_fn_with_state
            Self::Authenticated => {
                route.route_layer(middleware::from_fn_with_state(state.clone(), access_middleware))
            }
        }
    }
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let principal = match state.auth.authenticate(authorization) {
        Ok(principal) => principal,
        Err(AuthError::LookupUnavailable(err)) => {
            tracing::error!(error = %err, "user lookup failed during authentication");
            return Err(AppError::Internal);
        }
        Err(err) => {
            tracing::warn!(error = %err, "access token rejected");
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(user_id = principal.user_id, "request authenticated");

    // middleware -> extractor handoff
    req.extensions_mut().insert(AuthCtx::from(principal));

    Ok(next.run(req).await)
}
