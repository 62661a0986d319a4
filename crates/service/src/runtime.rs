//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so the binary can prepare directories
//! through the service crate it already depends on.

use configs::AppConfig;

/// Make sure the frontend and media directories exist before serving.
pub async fn ensure_env(cfg: &AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.server.frontend_dir, &cfg.storage.media_dir).await
}
