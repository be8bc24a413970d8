use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Owns a transient file on disk and removes it when dropped.
///
/// Moving the guard into a response body stream ties the file's lifetime to
/// the response: it is deleted once the body has been sent or abandoned.
#[derive(Debug)]
pub struct FileGuard {
    path: PathBuf,
    armed: bool,
}

impl FileGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file; hand back its path
    pub fn disarm(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    /// Delete the file now and report the outcome
    pub async fn remove(mut self) -> std::io::Result<()> {
        self.armed = false;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("🗑️  Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Synchronous so the file is gone when drop returns; a single unlink
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("🗑️  Removed {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
