pub mod auth;
pub mod franchises;
pub mod admin_franchises;
pub mod taxonomy;
pub mod gallery;
pub mod contact;
pub mod team_actions;
pub mod dashboard;
pub mod events;

use std::path::PathBuf;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{AppInfo, Health};

use crate::openapi::ApiDoc;
use auth::ServerState;

/// Files accepted in one multipart request (logo plus gallery).
pub const MAX_FILES_PER_REQUEST: usize = 21;

/// Where static content comes from.
#[derive(Clone, Debug)]
pub struct StaticDirs {
    /// Prebuilt SPA; unknown paths get its `index.html`.
    pub frontend: PathBuf,
    /// Object store root, served under `/media`.
    pub media: PathBuf,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> impl IntoResponse {
    match common::metrics::encode_metrics() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e).into_response(),
    }
}

#[utoipa::path(get, path = "/api/app-info", tag = "health", responses((status = 200, description = "Site name and contact details")))]
pub async fn app_info(State(state): State<ServerState>) -> Json<AppInfo> {
    Json(state.app.clone())
}

fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/app-info", get(app_info))
        .route("/api/franchises", get(franchises::list))
        .route("/api/franchises/search", get(franchises::search_page))
        .route("/api/franchises/search/category", get(franchises::by_category))
        .route("/api/franchises/search/location", get(franchises::by_location))
        .route("/api/franchises/search/investment", get(franchises::by_investment))
        .route("/api/franchises/:id", get(franchises::get))
        .route("/api/industries", get(taxonomy::public_industries))
        .route("/api/industries/:id/sectors", get(taxonomy::public_sectors_of))
        .route("/api/sectors/:id/services", get(taxonomy::public_services_of))
        .route("/api/states", get(taxonomy::public_states))
        .route("/api/states/:id/cities", get(taxonomy::public_cities_of))
        .route("/api/gallery", get(gallery::public_gallery))
        .route("/api/team-actions", get(team_actions::list))
        .route("/api/contact", post(contact::submit))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/auth/me", get(auth::me))
}

fn admin_routes(state: &ServerState) -> Router<ServerState> {
    let upload_limit = state.store.max_object_bytes().saturating_mul(MAX_FILES_PER_REQUEST);
    Router::new()
        .route("/admin/franchises", get(admin_franchises::list).post(admin_franchises::create))
        .route(
            "/admin/franchises/:id",
            get(admin_franchises::get).put(admin_franchises::update).delete(admin_franchises::delete),
        )
        .route("/admin/franchises/:id/status", patch(admin_franchises::set_status))
        .route("/admin/franchises/:id/gallery", get(gallery::list).post(gallery::add))
        .route("/admin/franchises/:id/gallery/order", put(gallery::reorder))
        .route("/admin/gallery/:id", patch(gallery::update).delete(gallery::delete))
        .route("/admin/industries", get(taxonomy::list_industries).post(taxonomy::create_industry))
        .route("/admin/industries/:id", put(taxonomy::update_industry).delete(taxonomy::delete_industry))
        .route("/admin/sectors", get(taxonomy::list_sectors).post(taxonomy::create_sector))
        .route("/admin/sectors/:id", put(taxonomy::update_sector).delete(taxonomy::delete_sector))
        .route("/admin/services", get(taxonomy::list_services).post(taxonomy::create_service))
        .route("/admin/services/:id", put(taxonomy::update_service).delete(taxonomy::delete_service))
        .route("/admin/states", get(taxonomy::list_states).post(taxonomy::create_state))
        .route("/admin/states/:id", put(taxonomy::update_state).delete(taxonomy::delete_state))
        .route("/admin/cities", get(taxonomy::list_cities).post(taxonomy::create_city))
        .route("/admin/cities/:id", put(taxonomy::update_city).delete(taxonomy::delete_city))
        .route("/admin/contact-queries", get(contact::list))
        .route("/admin/contact-queries/stats", get(contact::stats))
        .route("/admin/contact-queries/:id", patch(contact::update_status).delete(contact::delete))
        .route("/admin/team-actions", get(team_actions::list).post(team_actions::create))
        .route("/admin/team-actions/:id", put(team_actions::update).delete(team_actions::delete))
        .route("/admin/dashboard/stats", get(dashboard::stats))
        .route("/admin/events", get(events::stream))
        .route("/admin/admins", post(auth::create_admin))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit))
        // 鉴权放在最外层：未登录请求不读取请求体
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
}

/// Build the full application router: public API, admin API, docs, media and SPA fallback.
pub fn build_router(state: ServerState, cors: CorsLayer, dirs: StaticDirs) -> Router {
    let media = ServeDir::new(&dirs.media);
    let spa = ServeDir::new(&dirs.frontend).fallback(ServeFile::new(dirs.frontend.join("index.html")));

    Router::new()
        .merge(public_routes())
        .merge(admin_routes(&state))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/media", media)
        .fallback_service(spa)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
