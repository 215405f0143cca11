/*
 * Responsibility
 * - load Config -> build dependencies -> assemble the Router
 * - apply middleware (versioning / CORS / security headers / http)
 * - start with axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware, openapi,
    repos::Db,
    services::auth::{build_authenticator, build_token_issuer},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bonbonniere_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing; stderr may be hidden depending on how we are launched.
        tracing::error!(%info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        app_env = ?config.app_env,
        addr = %config.addr,
        "starting API"
    );

    let state = build_state(&config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Wire the process-level services into the shared application state.
pub fn build_state(config: &Config) -> AppState {
    let db = Db::new();
    let auth = build_authenticator(&config.auth, db.clone());
    let tokens = build_token_issuer(&config.auth);

    AppState::new(db, auth, tokens)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::api_version::apply(api::v1::routes(&state));

    let mut router = Router::new().nest("/api/v1", v1);

    // Do not expose the API description in production
    if !config.app_env.is_production() {
        router = router.route(openapi::SWAGGER_JSON_PATH, get(openapi::swagger_json));
    }

    let router = router.with_state(state);
    // CORS sits inside the security headers so preflight answers get them too
    let router = middleware::cors::apply(router, config);
    let router = middleware::security_headers::apply(router, config);
    middleware::http::apply(router)
}
