use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::types::AppInfo;
use server::routes::{self, auth, StaticDirs};
use service::auth::domain::Claims;
use service::events::ChangeFeed;
use service::storage::{LocalObjectStore, ObjectStore};

const SECRET: &str = "router-test-secret";

struct TestApp {
    router: Router,
    store: Arc<LocalObjectStore>,
    frontend: PathBuf,
}

// 不连接数据库：只覆盖在访问数据库之前就能得出结果的路径
async fn build_app() -> TestApp {
    let root = std::env::temp_dir().join(format!("franchise-hub-router-{}", Uuid::new_v4()));
    let media = root.join("media");
    let frontend = root.join("frontend");
    tokio::fs::create_dir_all(&frontend).await.unwrap();
    tokio::fs::write(frontend.join("index.html"), "<html>spa</html>").await.unwrap();

    let store = Arc::new(LocalObjectStore::new(&media, "franchise-gallery-images", "/media", 1024 * 1024).await.unwrap());
    let state = auth::ServerState {
        db: DatabaseConnection::Disconnected,
        auth: auth::ServerAuthConfig { jwt_secret: SECRET.into(), token_ttl_hours: 1, cookie_secure: false },
        store: store.clone(),
        events: ChangeFeed::default(),
        app: AppInfo {
            name: "Test Franchise World".into(),
            contact_email: "info@example.com".into(),
            support_phone: "+91-0000000000".into(),
        },
    };
    let dirs = StaticDirs { frontend: frontend.clone(), media };
    let router = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive(), dirs);
    TestApp { router, store, frontend }
}

fn token(secret: &str, ttl_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims { sub: "ops@example.com".into(), aid: Uuid::new_v4().to_string(), iat: now as usize, exp: (now + ttl_secs) as usize };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_metrics_and_app_info() {
    let app = build_app().await;

    let resp = app.router.clone().oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");

    let resp = app.router.clone().oneshot(Request::get("/metrics").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.router.clone().oneshot(Request::get("/api/app-info").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["name"], "Test Franchise World");
}

#[tokio::test]
async fn admin_routes_reject_missing_and_bad_tokens() {
    let app = build_app().await;

    let resp = app.router.clone().oneshot(Request::get("/admin/franchises").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["error"].is_string());

    let req = Request::get("/admin/dashboard/stats").header(header::AUTHORIZATION, "Bearer garbage").body(Body::empty()).unwrap();
    assert_eq!(app.router.clone().oneshot(req).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let req = Request::get("/admin/contact-queries").header(header::AUTHORIZATION, "Basic dXNlcg==").body(Body::empty()).unwrap();
    assert_eq!(app.router.clone().oneshot(req).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let forged = token("some-other-secret", 600);
    let req = Request::get("/admin/franchises").header(header::AUTHORIZATION, format!("Bearer {forged}")).body(Body::empty()).unwrap();
    assert_eq!(app.router.clone().oneshot(req).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let expired = token(SECRET, -3600);
    let req = Request::get("/admin/franchises").header(header::COOKIE, format!("auth_token={expired}")).body(Body::empty()).unwrap();
    assert_eq!(app.router.clone().oneshot(req).await.unwrap().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_cookie_token_passes_the_guard() {
    let app = build_app().await;
    let good = token(SECRET, 600);
    let req = Request::get("/admin/events").header(header::COOKIE, format!("auth_token={good}")).body(Body::empty()).unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(ct.starts_with("text/event-stream"), "content-type was {ct}");
}

#[tokio::test]
async fn session_without_token_is_anonymous() {
    let app = build_app().await;
    let resp = app.router.clone().oneshot(Request::get("/auth/session").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["is_authenticated"], false);
    assert!(body["admin"].is_null());

    let resp = app.router.clone().oneshot(Request::get("/auth/me").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = build_app().await;
    let req = Request::post("/auth/logout").header(header::COOKIE, "auth_token=abc").body(Body::empty()).unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookie = resp.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(cookie.starts_with("auth_token="), "set-cookie was {cookie}");
}

#[tokio::test]
async fn contact_with_bad_email_is_rejected_before_storage() {
    let app = build_app().await;
    let payload = json!({"name": "Asha", "email": "not-an-email", "subject": "Hello", "message": "Interested in a franchise"});
    let req = Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["message"].as_str().unwrap_or_default().contains("email"), "body was {body}");
}

#[tokio::test]
async fn media_and_spa_fallback_are_served() {
    let app = build_app().await;
    app.store.put("listing/logo.png", b"png-bytes").await.unwrap();

    let req = Request::get("/media/franchise-gallery-images/listing/logo.png").body(Body::empty()).unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()[..], b"png-bytes");

    let resp = app.router.clone().oneshot(Request::get("/franchise/some-deep-link").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&html[..], b"<html>spa</html>");

    let _ = tokio::fs::remove_dir_all(app.frontend.parent().unwrap()).await;
}
