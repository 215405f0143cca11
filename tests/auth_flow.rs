//! End-to-end checks of the bearer gate through the full router.

mod common;

use std::sync::Arc;

use axum::http::{StatusCode, header};
use bonbonniere_api::{
    app,
    repos::{
        error::RepoError,
        user_repo::{self, NewUserRow},
    },
    services::auth::{Account, UserLookup, build_authenticator, build_token_issuer},
    state::AppState,
};
use serde_json::json;

use common::{SECRET, body_json, get, register_and_login, send, setup, sign, token_for};

fn seed_users(state: &AppState, count: usize) {
    for n in 1..=count {
        user_repo::create(
            &state.db,
            NewUserRow {
                first_name: "Test".into(),
                last_name: format!("User{n}"),
                username: format!("user{n}"),
                password_hash: "unused".into(),
            },
        )
        .unwrap();
    }
}

#[tokio::test]
async fn anonymous_routes_need_no_header() {
    let (_, router) = setup();

    let res = send(&router, get("/api/v1/health", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn anonymous_routes_ignore_a_bad_header() {
    let (_, router) = setup();

    let res = send(&router, get("/api/v1/health", Some("garbage"))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_route_without_header_is_401() {
    let (_, router) = setup();

    let res = send(&router, get("/api/v1/users", None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let body = body_json(res).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn live_subject_is_attached_until_its_account_is_deleted() {
    let (state, router) = setup();
    seed_users(&state, 7);

    let token = token_for(SECRET, "7", 600);

    let res = send(&router, get("/api/v1/users/me", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let me = body_json(res).await;
    assert_eq!(me["id"], 7);
    assert_eq!(me["username"], "user7");

    assert!(user_repo::delete(&state.db, 7).unwrap());

    // same token, still cryptographically valid
    let res = send(&router, get("/api/v1/users/me", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let res = send(&router, get("/api/v1/users", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_from_login_works_and_dies_with_the_account() {
    let (_, router) = setup();
    let (id, token) = register_and_login(&router, "ada").await;

    let res = send(&router, get("/api/v1/users/me", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["id"], id);

    let res = send(
        &router,
        common::json_request("DELETE", &format!("/api/v1/users/{id}"), Some(&token), json!({})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = send(&router, get("/api/v1/users", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn foreign_signature_is_401_even_for_a_live_subject() {
    let (state, router) = setup();
    seed_users(&state, 7);

    let token = token_for("some-other-key", "7", 600);

    let res = send(&router, get("/api/v1/users/me", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_401_even_for_a_live_subject() {
    let (state, router) = setup();
    seed_users(&state, 1);

    let token = token_for(SECRET, "1", -3600);

    let res = send(&router, get("/api/v1/users", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unusable_subjects_are_401() {
    let (state, router) = setup();
    seed_users(&state, 1);
    let exp = chrono::Utc::now().timestamp() + 600;

    for claims in [
        json!({ "sub": "one", "exp": exp }),
        json!({ "sub": "", "exp": exp }),
        json!({ "exp": exp }),
        json!({ "sub": "999", "exp": exp }),
    ] {
        let token = sign(SECRET, claims.clone());
        let res = send(&router, get("/api/v1/users", Some(&token))).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{claims}");
    }
}

#[tokio::test]
async fn malformed_headers_are_401() {
    let (_, router) = setup();

    for value in ["Bearer", "Basic dXNlcjpwYXNz", "Bearer not.a.jwt"] {
        let req = axum::http::Request::builder()
            .uri("/api/v1/users")
            .header(header::AUTHORIZATION, value)
            .body(axum::body::Body::empty())
            .unwrap();
        let res = send(&router, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{value}");
    }
}

struct StoreDown;

impl UserLookup for StoreDown {
    fn lookup_by_id(&self, _id: i64) -> Result<Option<Account>, RepoError> {
        Err(RepoError::Unavailable("connection reset".into()))
    }
}

#[tokio::test]
async fn lookup_failure_is_500_not_401() {
    let config = common::config(&[]);
    let base = app::build_state(&config);
    let state = AppState::new(
        base.db.clone(),
        build_authenticator(&config.auth, Arc::new(StoreDown)),
        build_token_issuer(&config.auth),
    );
    let router = app::build_router(state, &config);

    let token = token_for(SECRET, "1", 600);
    let res = send(&router, get("/api/v1/users", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // signature failures are still rejected before the store is asked
    let token = token_for("other", "1", 600);
    let res = send(&router, get("/api/v1/users", Some(&token))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
