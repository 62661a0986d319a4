use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use common::types::AppInfo;
use configs::AppConfig;
use service::auth::domain::CreateAdminInput;
use service::events::ChangeFeed;
use service::runtime;
use service::storage::LocalObjectStore;

use crate::errors::StartupError;
use crate::routes::{self, auth, StaticDirs};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Connect the database, open the media bucket and assemble handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<auth::ServerState, StartupError> {
    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
    let db = models::db::connect_with_config(&db_cfg).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Runtime(format!("migrate: {e}")))?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let store = LocalObjectStore::new(
        &cfg.storage.media_dir,
        &cfg.storage.bucket,
        &cfg.storage.public_base_url,
        cfg.storage.max_upload_bytes,
    )
    .await
    .map_err(|e| StartupError::Runtime(e.to_string()))?;

    Ok(auth::ServerState {
        db,
        auth: auth::ServerAuthConfig {
            jwt_secret: cfg.auth.effective_secret(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
            cookie_secure: cfg.auth.cookie_secure,
        },
        store: Arc::new(store),
        events: ChangeFeed::default(),
        app: AppInfo {
            name: cfg.app.name.clone(),
            contact_email: cfg.app.contact_email.clone(),
            support_phone: cfg.app.support_phone.clone(),
        },
    })
}

/// Create the configured admin when the admins table is empty.
async fn bootstrap_admin(state: &auth::ServerState, cfg: &AppConfig) -> Result<(), StartupError> {
    let (Some(email), Some(password)) = (cfg.auth.bootstrap_admin_email.clone(), cfg.auth.bootstrap_admin_password.clone()) else {
        return Ok(());
    };
    let name = cfg.auth.bootstrap_admin_name.clone().unwrap_or_else(|| "Administrator".into());
    match state.auth_service().bootstrap_admin(CreateAdminInput { email, name, password }).await {
        Ok(Some(admin)) => info!(event = "bootstrap_admin", admin_id = %admin.id, "bootstrap admin created"),
        Ok(None) => {}
        Err(e) => return Err(StartupError::Runtime(format!("bootstrap admin: {e}"))),
    }
    Ok(())
}

pub fn static_dirs(cfg: &AppConfig) -> StaticDirs {
    StaticDirs {
        frontend: PathBuf::from(&cfg.server.frontend_dir),
        media: PathBuf::from(&cfg.storage.media_dir),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c listener failed; running until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    runtime::ensure_env(&cfg).await?;

    let state = build_state(&cfg).await?;
    bootstrap_admin(&state, &cfg).await?;

    let app: Router = routes::build_router(state, build_cors(), static_dirs(&cfg));

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting franchise hub server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}
