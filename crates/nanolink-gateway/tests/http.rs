use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use nanolink_cache::MokaLinkCache;
use nanolink_core::{ShortCode, ShortLink, Shortener, ShortenerError, StorageError};
use nanolink_gateway::{App, AppState};
use nanolink_generator::{RandomGenerator, SeqGenerator};
use nanolink_shortener::ShortenerService;
use nanolink_storage::{CachedRepository, InMemoryRepository, SqliteRepository};
use serde_json::{json, Value};
use tower::ServiceExt;

const BASE_URL: &str = "http://localhost:5000";

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

fn app_with(shortener: impl Shortener) -> Router {
    App::router(AppState::new(Arc::new(shortener), BASE_URL))
}

fn in_memory_app() -> Router {
    app_with(ShortenerService::new(
        InMemoryRepository::new(),
        RandomGenerator::new(),
    ))
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_json(app: &Router, body: Value) -> TestResponse {
    post_raw(app, body.to_string()).await
}

async fn post_raw(app: &Router, body: impl Into<Body>) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/shorten")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

fn code_of(short_url: &Value) -> String {
    let short_url = short_url.as_str().unwrap();
    let prefix = format!("{BASE_URL}/");
    assert!(short_url.starts_with(&prefix), "unexpected short url {short_url}");
    short_url[prefix.len()..].to_string()
}

#[tokio::test]
async fn home_returns_welcome_message() {
    let app = in_memory_app();

    let response = get(&app, "/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({ "message": "Welcome to NanoLink API <3" })
    );
}

#[tokio::test]
async fn shorten_returns_created_short_url() {
    let app = in_memory_app();

    let response = post_json(&app, json!({ "url": "https://www.google.com" })).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let code = code_of(&response.body["short_url"]);
    assert!(ShortCode::new(code).is_ok());
}

#[tokio::test]
async fn shorten_expand_and_redirect() {
    let app = in_memory_app();
    let original = "https://example.com/some/path?q=1&r=2#frag";

    let created = post_json(&app, json!({ "url": original })).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let code = code_of(&created.body["short_url"]);

    let expanded = get(&app, &format!("/expand/{code}")).await;
    assert_eq!(expanded.status, StatusCode::OK);
    assert_eq!(expanded.body, json!({ "original_url": original }));

    let redirected = get(&app, &format!("/{code}")).await;
    assert_eq!(redirected.status, StatusCode::FOUND);
    assert_eq!(redirected.headers[header::LOCATION], original);
}

#[tokio::test]
async fn same_url_twice_gets_two_codes() {
    let app = in_memory_app();

    let first = post_json(&app, json!({ "url": "https://example.com" })).await;
    let second = post_json(&app, json!({ "url": "https://example.com" })).await;

    assert_ne!(first.body["short_url"], second.body["short_url"]);
}

#[tokio::test]
async fn shorten_rejects_missing_or_unusable_url() {
    let app = in_memory_app();

    for body in [
        json!({}),
        json!({ "url": "" }),
        json!({ "url": null }),
        json!({ "url": 42 }),
        json!({ "url": ["https://example.com"] }),
        json!({ "link": "https://example.com" }),
    ] {
        let response = post_json(&app, body.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(response.body, json!({ "error": "URL is required" }));
    }
}

#[tokio::test]
async fn shorten_rejects_unparsable_body() {
    let app = in_memory_app();

    let response = post_raw(&app, "{not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "URL is required" }));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/shorten")
        .body(Body::from(r#"{"url":"https://example.com"}"#))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "URL is required" }));
}

#[tokio::test]
async fn shorten_enforces_url_length() {
    let app = in_memory_app();
    let prefix = "https://example.com/";

    let at_limit = format!("{prefix}{}", "a".repeat(500 - prefix.len()));
    let response = post_json(&app, json!({ "url": at_limit })).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let too_long = format!("{prefix}{}", "a".repeat(501 - prefix.len()));
    let response = post_json(&app, json!({ "url": too_long })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "error": "URL must be at most 500 characters" })
    );
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let app = in_memory_app();

    let expanded = get(&app, "/expand/ZZZZZZ").await;
    assert_eq!(expanded.status, StatusCode::NOT_FOUND);
    assert_eq!(expanded.body, json!({ "error": "Short code not found" }));

    let redirected = get(&app, "/ZZZZZZ").await;
    assert_eq!(redirected.status, StatusCode::NOT_FOUND);
    assert_eq!(redirected.body, json!({ "error": "Short code not found" }));
}

#[tokio::test]
async fn malformed_codes_are_not_found() {
    let app = in_memory_app();

    for uri in ["/expand/abc", "/expand/abcdefgh", "/abc", "/a-b_c!"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "uri {uri}");
    }
}

#[tokio::test]
async fn codes_are_case_sensitive() {
    let app = app_with(ShortenerService::new(
        InMemoryRepository::new(),
        SeqGenerator::new(),
    ));

    let created = post_json(&app, json!({ "url": "https://example.com" })).await;
    assert_eq!(code_of(&created.body["short_url"]), "AAAAAA");

    assert_eq!(get(&app, "/expand/AAAAAA").await.status, StatusCode::OK);
    assert_eq!(
        get(&app, "/expand/aaaaaa").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn short_url_uses_configured_base_without_double_slash() {
    let service = ShortenerService::new(InMemoryRepository::new(), SeqGenerator::new());
    let app = App::router(AppState::new(Arc::new(service), "https://nano.link/"));

    let response = post_json(&app, json!({ "url": "https://example.com" })).await;

    assert_eq!(
        response.body,
        json!({ "short_url": "https://nano.link/AAAAAA" })
    );
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = in_memory_app();

    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "https://frontend.example")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/shorten")
        .header(header::ORIGIN, "https://frontend.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, preflight).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

struct ExhaustedShortener;

#[async_trait]
impl Shortener for ExhaustedShortener {
    async fn shorten(&self, _original_url: &str) -> Result<ShortLink, ShortenerError> {
        Err(ShortenerError::Exhausted { attempts: 5 })
    }

    async fn resolve(&self, _code: &ShortCode) -> Result<Option<ShortLink>, ShortenerError> {
        Ok(None)
    }
}

struct BrokenStoreShortener;

#[async_trait]
impl Shortener for BrokenStoreShortener {
    async fn shorten(&self, _original_url: &str) -> Result<ShortLink, ShortenerError> {
        Err(StorageError::Unavailable("connection refused".into()).into())
    }

    async fn resolve(&self, _code: &ShortCode) -> Result<Option<ShortLink>, ShortenerError> {
        Err(StorageError::Timeout("pool timed out".into()).into())
    }
}

#[tokio::test]
async fn exhausted_retries_are_service_unavailable() {
    let app = app_with(ExhaustedShortener);

    let response = post_json(&app, json!({ "url": "https://example.com" })).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.body,
        json!({ "error": "Service temporarily unavailable" })
    );
}

#[tokio::test]
async fn storage_failures_are_internal_errors() {
    let app = app_with(BrokenStoreShortener);

    let created = post_json(&app, json!({ "url": "https://example.com" })).await;
    assert_eq!(created.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(created.body, json!({ "error": "Internal server error" }));

    for uri in ["/expand/abc123", "/abc123"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, json!({ "error": "Internal server error" }));
    }
}

#[tokio::test]
async fn end_to_end_with_cached_sqlite() {
    let repository = SqliteRepository::in_memory().await.unwrap();
    let cached = CachedRepository::new(repository, MokaLinkCache::new());
    let app = app_with(ShortenerService::new(cached, RandomGenerator::new()));

    let mut created = vec![];
    for i in 0..20 {
        let url = format!("https://example.com/{i}");
        let response = post_json(&app, json!({ "url": url })).await;
        assert_eq!(response.status, StatusCode::CREATED);
        created.push((code_of(&response.body["short_url"]), url));
    }

    for (code, url) in created {
        let redirected = get(&app, &format!("/{code}")).await;
        assert_eq!(redirected.status, StatusCode::FOUND);
        assert_eq!(redirected.headers[header::LOCATION], url.as_str());

        let expanded = get(&app, &format!("/expand/{code}")).await;
        assert_eq!(expanded.body, json!({ "original_url": url }));
    }

    assert_eq!(
        get(&app, "/expand/ZZZZZZ").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn concurrent_creates_over_http() {
    let app = in_memory_app();
    let mut handles = vec![];

    for i in 0..100 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let response = post_json(&app, json!({ "url": format!("https://example.com/{i}") })).await;
            assert_eq!(response.status, StatusCode::CREATED);
            code_of(&response.body["short_url"])
        }));
    }

    let mut codes = std::collections::HashSet::new();
    for handle in handles {
        assert!(codes.insert(handle.await.unwrap()));
    }
    assert_eq!(codes.len(), 100);
}

#[tokio::test]
async fn redirect_escapes_control_characters() {
    let app = in_memory_app();
    let original = "https://a.com/x\ny";

    let created = post_json(&app, json!({ "url": original })).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let code = code_of(&created.body["short_url"]);

    let expanded = get(&app, &format!("/expand/{code}")).await;
    assert_eq!(expanded.body, json!({ "original_url": original }));

    let redirected = get(&app, &format!("/{code}")).await;
    assert_eq!(redirected.status, StatusCode::FOUND);
    assert_eq!(redirected.headers[header::LOCATION], "https://a.com/x%0Ay");
}

#[tokio::test]
async fn redirect_percent_encodes_non_ascii() {
    let app = in_memory_app();

    let created = post_json(&app, json!({ "url": "https://a.com/café" })).await;
    let code = code_of(&created.body["short_url"]);

    let redirected = get(&app, &format!("/{code}")).await;
    assert_eq!(redirected.status, StatusCode::FOUND);
    assert_eq!(
        redirected.headers[header::LOCATION],
        "https://a.com/caf%C3%A9"
    );
}

#[tokio::test]
async fn malformed_codes_never_reach_the_store() {
    // The store behind this app fails every lookup, so a 404 proves the
    // code was rejected before resolving.
    let app = app_with(BrokenStoreShortener);

    for uri in ["/expand/abc", "/expand/abc-12", "/abcdefg", "/ab%20cd"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "uri {uri}");
        assert_eq!(response.body, json!({ "error": "Short code not found" }));
    }
}
