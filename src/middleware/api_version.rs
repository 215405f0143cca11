//! API version negotiation for the `/api/v1` tree.
//!
//! The version lives in the URL segment. A client may also name it with the
//! `api-version` header or query parameter; if it does, it has to agree with
//! what this tree serves. Without either, 1.0 is assumed.
//! Every response reports the supported versions.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::AppError;

pub const VERSION_PARAM: &str = "api-version";
pub const SUPPORTED_VERSIONS: &str = "1.0";

pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(middleware::from_fn(check_requested_version))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("api-supported-versions"),
            HeaderValue::from_static(SUPPORTED_VERSIONS),
        ))
}

async fn check_requested_version(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    if let Some(requested) = requested_version(req.headers(), req.uri().query())
        && !is_supported(&requested)
    {
        tracing::debug!(requested = %requested, "unsupported api version requested");
        return Err(AppError::bad_request(
            "UNSUPPORTED_API_VERSION",
            format!("api version '{requested}' is not supported; supported: {SUPPORTED_VERSIONS}"),
        ));
    }

    Ok(next.run(req).await)
}

/// Header wins over the query string.
fn requested_version(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(value) = headers.get(VERSION_PARAM) {
        return Some(value.to_str().unwrap_or_default().to_string());
    }

    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == VERSION_PARAM)
        .map(|(_, value)| value.into_owned())
}

fn is_supported(requested: &str) -> bool {
    matches!(
        requested.trim().trim_start_matches(['v', 'V']),
        "1" | "1.0"
    )
}
