//! HTTP API tests
//!
//! Drives the full route table with `actix_web::test` over an in-memory store.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, dev::ServiceResponse};
use serde_json::{Value, json};

use urlshortener::api::constants::SESSION_COOKIE_NAME;
use urlshortener::api::services::ApiResponse;
use urlshortener::config::StaticConfig;
use urlshortener::runtime::lifetime::startup::StartupContext;
use urlshortener::storage::{LinkStore, MemoryStore, ShortLink};

// =============================================================================
// Test Setup
// =============================================================================

fn test_context(store: Arc<MemoryStore>) -> StartupContext {
    let mut config = StaticConfig::default();
    config.auth.jwt_secret = "api_test_secret".to_string();
    StartupContext::from_storage(store, &config)
}

macro_rules! init_app {
    ($store:expr) => {{
        let ctx = test_context($store);
        test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await
    }};
}

async fn body_json<B: actix_web::body::MessageBody>(resp: ServiceResponse<B>) -> ApiResponse<Value> {
    test::read_body_json(resp).await
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .map(|c| c.into_owned())
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

fn credentials(username: &str, password: &str) -> Value {
    json!({"username": username, "password": password})
}

// =============================================================================
// Health & redirect
// =============================================================================

#[actix_rt::test]
async fn test_health() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body.code, 0);
    assert_eq!(body.data.unwrap()["status"], "healthy");
}

#[actix_rt::test]
async fn test_anonymous_shorten_and_redirect() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .set_json(json!({"url": "https://example.com/landing"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = body_json(resp).await;
    assert_eq!(body.message, "Shortened URL created");
    let data = body.data.unwrap();
    let code = data["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);
    assert!(data.get("owner").is_none());
    assert!(data["short_url"].as_str().unwrap().ends_with(&format!("/u/{}", code)));

    let req = TestRequest::get().uri(&format!("/u/{}", code)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://example.com/landing"
    );
}

#[actix_rt::test]
async fn test_redirect_unknown_and_malformed_codes() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    for uri in ["/u/ZZZZZZZZ", "/u/abc", "/u/abc12345"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_rt::test]
async fn test_invalid_url_rejected_and_not_stored() {
    let store = Arc::new(MemoryStore::new());
    let app = init_app!(store.clone());

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .set_json(json!({"url": "not-a-url"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await.code, 1000);
    assert_eq!(store.link_count(), 0);
}

#[actix_rt::test]
async fn test_url_with_embedded_newline_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = init_app!(store.clone());

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .set_json(json!({"url": "https://example.com/a\nb"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await.code, 1000);
    assert_eq!(store.link_count(), 0);
}

#[actix_rt::test]
async fn test_redirect_normalizes_stored_target_with_newline() {
    let store = Arc::new(MemoryStore::new());
    // 校验收紧前写入的数据
    store
        .insert_link(&ShortLink::new("LegacyAb", "https://example.com/a\nb"))
        .await
        .unwrap();
    let app = init_app!(store);

    let resp = test::call_service(&app, TestRequest::get().uri("/u/LegacyAb").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://example.com/ab"
    );
}

#[actix_rt::test]
async fn test_malformed_body_uses_envelope() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await.code, 1000);
}

// =============================================================================
// Accounts
// =============================================================================

#[actix_rt::test]
async fn test_register_sets_cookie_and_token() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(credentials("alice", "secret123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let cookie = session_cookie(&resp).expect("session cookie");
    assert!(cookie.http_only().unwrap_or(false));
    assert!(!cookie.value().is_empty());

    let body = body_json(resp).await;
    assert_eq!(body.message, "User created");
    let data = body.data.unwrap();
    assert_eq!(data["username"], "alice");
    assert_eq!(data["token"].as_str().unwrap(), cookie.value());
    assert_eq!(data["expires_in"], 3600);
}

#[actix_rt::test]
async fn test_duplicate_registration_conflicts() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(credentials("alice", "secret123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
        if expected == StatusCode::CONFLICT {
            assert_eq!(body_json(resp).await.code, 2006);
        }
    }
}

#[actix_rt::test]
async fn test_signed_in_user_cannot_register_or_login() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(credentials("alice", "secret123"))
        .to_request();
    let cookie = session_cookie(&test::call_service(&app, req).await).unwrap();

    for uri in ["/api/v1/auth/register", "/api/v1/auth/login"] {
        let req = TestRequest::post()
            .uri(uri)
            .cookie(cookie.clone())
            .set_json(credentials("bob", "hunter2"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT, "{uri}");
        assert_eq!(body_json(resp).await.code, 2005);
    }
}

#[actix_rt::test]
async fn test_stale_cookie_counts_as_anonymous() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::post()
        .uri("/api/v1/auth/register")
        .cookie(Cookie::new(SESSION_COOKIE_NAME, "garbage.token.value"))
        .set_json(credentials("alice", "secret123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_login_flow() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(credentials("alice", "secret123"))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(credentials("alice", "wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(resp).await;
    assert_eq!(wrong_password.code, 2000);

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(credentials("nobody", "secret123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await.message, wrong_password.message);

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(credentials("alice", "secret123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).expect("session cookie");

    let req = TestRequest::get()
        .uri("/api/v1/auth/session")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.data.unwrap()["username"], "alice");
}

#[actix_rt::test]
async fn test_logout_expires_cookie() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let resp = test::call_service(
        &app,
        TestRequest::post().uri("/api/v1/auth/logout").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = session_cookie(&resp).expect("expired cookie");
    assert!(cookie.value().is_empty());
    assert_eq!(cookie.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
}

#[actix_rt::test]
async fn test_protected_routes_require_session() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let requests = [
        TestRequest::get().uri("/api/v1/links").to_request(),
        TestRequest::delete().uri("/api/v1/links/AbCdEfGh").to_request(),
        TestRequest::get().uri("/api/v1/auth/session").to_request(),
        TestRequest::delete().uri("/api/v1/account").to_request(),
        TestRequest::get()
            .uri("/api/v1/links")
            .insert_header(bearer("not-a-token"))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await.code, 1001);
    }
}

// =============================================================================
// Ownership
// =============================================================================

macro_rules! register_token {
    ($app:expr, $username:expr) => {{
        let req = TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(credentials($username, "secret123"))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await.data.unwrap()["token"]
            .as_str()
            .unwrap()
            .to_string()
    }};
}

#[actix_rt::test]
async fn test_owned_link_lifecycle() {
    let app = init_app!(Arc::new(MemoryStore::new()));
    let alice = register_token!(&app, "alice");
    let bob = register_token!(&app, "bob");

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(bearer(&alice))
        .set_json(json!({"url": "https://example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let data = body_json(resp).await.data.unwrap();
    assert_eq!(data["owner"], "alice");
    let code = data["code"].as_str().unwrap().to_string();

    // alice 能看到，bob 看不到
    let req = TestRequest::get()
        .uri("/api/v1/links")
        .insert_header(bearer(&alice))
        .to_request();
    let listed = body_json(test::call_service(&app, req).await).await.data.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["code"], code.as_str());

    let req = TestRequest::get()
        .uri("/api/v1/links")
        .insert_header(bearer(&bob))
        .to_request();
    let listed = body_json(test::call_service(&app, req).await).await.data.unwrap();
    assert!(listed.as_array().unwrap().is_empty());

    // bob 删除失败，链接仍然可用
    let req = TestRequest::delete()
        .uri(&format!("/api/v1/links/{}", code))
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body.code, 3001);
    assert_eq!(body.message, "URL not owned by you");

    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/u/{}", code)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    // alice 删除成功
    let req = TestRequest::delete()
        .uri(&format!("/api/v1/links/{}", code))
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.message, "Deleted shortened URL");

    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/u/{}", code)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_invalid_token_on_shorten_is_anonymous() {
    let app = init_app!(Arc::new(MemoryStore::new()));

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(bearer("forged.token.value"))
        .set_json(json!({"url": "https://example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(body_json(resp).await.data.unwrap().get("owner").is_none());
}

#[actix_rt::test]
async fn test_delete_account_removes_links_and_cookie() {
    let store = Arc::new(MemoryStore::new());
    let app = init_app!(store.clone());
    let alice = register_token!(&app, "alice");

    let mut codes = Vec::new();
    for i in 0..3 {
        let req = TestRequest::post()
            .uri("/api/v1/links")
            .insert_header(bearer(&alice))
            .set_json(json!({"url": format!("https://example.com/{}", i)}))
            .to_request();
        let data = body_json(test::call_service(&app, req).await).await.data.unwrap();
        codes.push(data["code"].as_str().unwrap().to_string());
    }
    assert_eq!(store.link_count(), 3);

    let req = TestRequest::delete()
        .uri("/api/v1/account")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).unwrap().value().is_empty());
    assert_eq!(body_json(resp).await.message, "User deleted");

    assert_eq!(store.link_count(), 0);
    for code in codes {
        let resp = test::call_service(
            &app,
            TestRequest::get().uri(&format!("/u/{}", code)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(credentials("alice", "secret123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
