#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use bonbonniere_api::{app, config::Config, state::AppState};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "s3cr3t";

pub fn config(extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("AUTH_SECRET".into(), SECRET.into());
    vars.insert("ACCESS_TOKEN_LEEWAY_SECONDS".into(), "0".into());
    for (k, v) in extra {
        vars.insert((*k).into(), (*v).into());
    }
    Config::from_vars(|key| vars.get(key).cloned()).unwrap()
}

pub fn setup() -> (AppState, Router) {
    let config = config(&[]);
    let state = app::build_state(&config);
    let router = app::build_router(state.clone(), &config);
    (state, router)
}

pub fn sign(secret: &str, claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Token for `sub` expiring `exp_offset` seconds from now.
pub fn token_for(secret: &str, sub: &str, exp_offset: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + exp_offset;
    sign(secret, json!({ "sub": sub, "exp": exp }))
}

pub async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router.clone().oneshot(req).await.unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(res: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register through the API, then log in. Returns (user id, token).
pub async fn register_and_login(router: &Router, username: &str) -> (i64, String) {
    let res = send(
        router,
        json_request(
            "POST",
            "/api/v1/users/register",
            None,
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "username": username,
                "password": "pa55word",
            }),
        ),
    )
    .await;
    assert_eq!(res.status(), 201);

    let res = send(
        router,
        json_request(
            "POST",
            "/api/v1/users/authenticate",
            None,
            json!({ "username": username, "password": "pa55word" }),
        ),
    )
    .await;
    assert_eq!(res.status(), 200);

    let body = body_json(res).await;
    (
        body["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}
