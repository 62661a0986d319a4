//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure expected directories exist; warn on missing optional ones.
///
/// The frontend build is optional (API-only deployments); the media
/// directory backs the object store and must be writable.
pub async fn ensure_env(frontend_dir: &str, media_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; static assets may 404");
    }
    tokio::fs::create_dir_all(media_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {media_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ensure_env;

    #[tokio::test]
    async fn creates_missing_media_dir() -> anyhow::Result<()> {
        let base = std::env::temp_dir().join(format!("env_check_{}", std::process::id()));
        let media = base.join("media");
        let media_str = media.to_string_lossy().to_string();
        ensure_env("/nonexistent-frontend-dir", &media_str).await?;
        assert!(tokio::fs::metadata(&media).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&base).await;
        Ok(())
    }
}
