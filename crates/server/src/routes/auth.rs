use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use common::types::AppInfo;
use service::auth::domain::{AuthAdmin, AuthStatus, Claims, CreateAdminInput, LoginInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{decode_token, AuthConfig, AuthService};
use service::events::{ChangeAction, ChangeFeed};
use service::storage::ObjectStore;

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cookie_secure: bool,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub store: Arc<dyn ObjectStore>,
    pub events: ChangeFeed,
    pub app: AppInfo,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(repo, AuthConfig { jwt_secret: self.auth.jwt_secret.clone(), token_ttl_hours: self.auth.token_ttl_hours })
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginOutput {
    pub admin_id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub token: String,
    pub expires_at: i64,
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Bearer header first, then the `auth_token` cookie.
fn request_token(headers: &axum::http::HeaderMap) -> Result<Option<String>, ()> {
    if let Some(h) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(()),
        };
    }
    let jar = CookieJar::from_headers(headers);
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged In", body = LoginOutput), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth_service().login(input).await?;
    let jar = jar.add(session_cookie(session.token.clone(), state.auth.cookie_secure));
    let out = LoginOutput {
        admin_id: session.admin.id,
        email: session.admin.email,
        name: session.admin.name,
        token: session.token,
        expires_at: session.expires_at,
    };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut gone = Cookie::from(AUTH_COOKIE);
    gone.set_path("/");
    (jar.remove(gone), StatusCode::NO_CONTENT)
}

/// Never fails on a bad token; reports `is_authenticated: false` instead.
#[utoipa::path(get, path = "/auth/session", tag = "auth", responses((status = 200, description = "Session status")))]
pub async fn session(State(state): State<ServerState>, req_headers: axum::http::HeaderMap) -> Result<Json<AuthStatus>, JsonApiError> {
    let token = request_token(&req_headers).ok().flatten();
    Ok(Json(state.auth_service().check_status(token.as_deref()).await?))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current admin"), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, req_headers: axum::http::HeaderMap) -> Result<Json<AuthAdmin>, JsonApiError> {
    let token = request_token(&req_headers).ok().flatten().ok_or_else(JsonApiError::unauthorized)?;
    let admin = state.auth_service().current_admin(&token).await?.ok_or_else(JsonApiError::unauthorized)?;
    Ok(Json(admin))
}

#[utoipa::path(post, path = "/admin/admins", tag = "auth", request_body = crate::openapi::CreateAdminRequest,
    responses((status = 200, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Conflict")))]
pub async fn create_admin(State(state): State<ServerState>, Json(input): Json<CreateAdminInput>) -> Result<Json<AuthAdmin>, JsonApiError> {
    let admin = state.auth_service().create_admin(input).await?;
    state.events.publish("admins", ChangeAction::Insert, Some(admin.id));
    Ok(Json(admin))
}

/// Guard for `/admin/*`: a valid HS256 token from the Authorization header or
/// the `auth_token` cookie. Missing or bad tokens get 401. Verified claims are
/// attached to the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    // CORS 预检直接放行
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();

    let token = match request_token(req.headers()) {
        Ok(Some(t)) => t,
        Ok(None) => {
            tracing::warn!(%path, "missing Authorization header and auth_token cookie");
            return Err(JsonApiError::unauthorized());
        }
        Err(()) => {
            tracing::warn!(%path, "invalid Authorization format (expect Bearer)");
            return Err(JsonApiError::unauthorized());
        }
    };

    match decode_token(&state.auth.jwt_secret, &token) {
        Ok(claims) => {
            req.extensions_mut().insert::<Claims>(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(%path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized())
        }
    }
}
