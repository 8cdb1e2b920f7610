mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

use blog_rust_ws::cache::{CacheClient, MemoryCacheStore};
use blog_rust_ws::cache_ttl::CacheTtl;
use blog_rust_ws::create_app_router;
use blog_rust_ws::domains::blog::BlogService;
use blog_rust_ws::domains::users::UserService;
use blog_rust_ws::state::AppState;
use shared::config::AuthConfig;
use shared::AuthService;

struct TestApp {
    router: Router,
    auth: Arc<AuthService>,
    repo: Arc<common::FakeBlogRepository>,
}

fn app() -> TestApp {
    let auth = Arc::new(
        AuthService::new(&AuthConfig {
            jwt_secret: "router-test-secret".to_string(),
            access_token_ttl_seconds: 3_600,
        })
        .unwrap()
        .with_bcrypt_cost(4),
    );
    let repo = common::FakeBlogRepository::new();
    let cache = Arc::new(MemoryCacheStore::new());

    let state = AppState {
        // never connected; no route under test touches it
        db_pool: PgPoolOptions::new()
            .connect_lazy("postgres://localhost:5432/blog_test")
            .unwrap(),
        redis_store: None,
        cache_enabled: true,
        auth: auth.clone(),
        blog_service: BlogService::new(repo.clone(), CacheClient::new(cache), CacheTtl::default()),
        user_service: UserService::new(common::FakeUserRepository::new(), auth.clone()),
    };

    TestApp {
        router: create_app_router(Arc::new(state)),
        auth,
        repo,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn root_reports_running() {
    let app = app();
    let (status, body) = send(&app.router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Blog API is running!" }));
}

#[tokio::test]
async fn writes_without_a_token_are_unauthorized() {
    let app = app();
    let body = json!({ "title": "t", "content": "c", "tags": ["go"] });

    let (status, body) = send(
        &app.router,
        json_request(Method::POST, "/api/v1/create_blog", None, body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Unauthorized" }));

    let (status, _) = send(
        &app.router,
        json_request(Method::POST, "/api/v1/create_blog", Some("garbage"), body),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repo.len(), 0);
}

#[tokio::test]
async fn register_login_create_and_read_back() {
    let app = app();

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/register",
            None,
            json!({ "email": "ann@example.com", "password": "pw", "name": "Ann" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Create user successfully.");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/login",
            None,
            json!({ "email": "ann@example.com", "password": "pw" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/create_blog",
            Some(&token),
            json!({ "title": "Hello World", "content": "c", "tags": ["go"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blog created successfully.");
    let blog_id = body["data"]["blog_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app.router, get(&format!("/api/v1/blog/{}", blog_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slug"], "hello-world");

    let (status, body) = send(&app.router, get("/api/v1/all_blogs?page=1&limit=10&tags=GO")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_item"], 1);
    assert_eq!(body["data"]["total_pages"], 1);
}

#[tokio::test]
async fn repeated_query_params_fall_back_to_default_paging() {
    let app = app();

    let (status, body) = send(&app.router, get("/api/v1/all_blogs?page=1&page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 10);
    assert_eq!(body["data"]["total_item"], 0);
}

#[tokio::test]
async fn login_failures_use_the_documented_statuses() {
    let app = app();
    send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/register",
            None,
            json!({ "email": "ann@example.com", "password": "pw", "name": "Ann" }),
        ),
    )
    .await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/login",
            None,
            json!({ "email": "nobody@example.com", "password": "pw" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invalid email or password.");

    let (status, _) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/login",
            None,
            json!({ "email": "ann@example.com", "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_author_update_and_delete_are_forbidden() {
    let app = app();
    app.repo.seed(common::blog("a1", "owner", &["go"]));
    let intruder = app.auth.issue_token("intruder", "i@example.com").unwrap();

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            "/api/v1/update_blog/a1",
            Some(&intruder),
            json!({ "title": "x", "content": "y", "tags": ["z"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not authorized to update this blog.");

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/delete_blog/a1")
        .header(header::AUTHORIZATION, format!("Bearer {}", intruder))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.repo.len(), 1);
}

#[tokio::test]
async fn owner_can_update_and_delete() {
    let app = app();
    app.repo.seed(common::blog("a1", "owner", &["go"]));
    let token = app.auth.issue_token("owner", "o@example.com").unwrap();

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            "/api/v1/update_blog/a1",
            Some(&token),
            json!({ "title": "Fresh Title", "content": "y", "tags": ["rust"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Blog updated successfully." }));
    assert_eq!(app.repo.row("a1").unwrap().slug, "fresh-title");

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/delete_blog/a1")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blog deleted successfully.");

    let (status, body) = send(&app.router, get("/api/v1/blog/a1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Blog not found.");
}

#[tokio::test]
async fn malformed_bodies_and_missing_fields_are_bad_requests() {
    let app = app();
    let token = app.auth.issue_token("u1", "u@example.com").unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/create_blog")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid body.");

    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/api/v1/create_blog",
            Some(&token),
            json!({ "title": "t", "content": "c", "tags": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields.");
    assert_eq!(app.repo.len(), 0);
}
