use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Create the downloads directory if needed and return its absolute path
pub async fn setup_storage(dir: &Path) -> Result<PathBuf> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        info!("📁 Downloads directory {} not found, creating...", dir.display());
    }

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create downloads directory {}", dir.display()))?;

    let dir = tokio::fs::canonicalize(dir)
        .await
        .with_context(|| format!("failed to resolve downloads directory {}", dir.display()))?;

    let meta = tokio::fs::metadata(&dir).await?;
    anyhow::ensure!(meta.is_dir(), "{} is not a directory", dir.display());

    info!("✅ Downloads directory ready: {}", dir.display());
    Ok(dir)
}
