//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected files exist at startup.

use tracing::warn;

/// Warn when the e-mail logo is missing and make sure the data directory exists.
pub async fn ensure_env(logo_path: &str, data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(logo_path).await.is_err() {
        warn!(%logo_path, "email logo not found; outgoing emails will reference a missing image");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}
