//! Completion watcher for fetched media.
//!
//! yt-dlp may still be flushing when its process reports a result, so the
//! download flow samples the file size until two consecutive samples match.
//! This is a heuristic: a stalled download looks identical to a finished one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Download not completed: {} still changing after {:?}", path.display(), timeout)]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("Failed to inspect downloaded file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct CompletionWatcher {
    interval: Duration,
    timeout: Duration,
}

impl CompletionWatcher {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Wait until the size of `path` is the same on two consecutive polls.
    ///
    /// A missing file is not an error; the tick is skipped and polling goes on
    /// until the timeout. Returns the stable size in bytes.
    pub async fn wait_for_stable(&self, path: &Path) -> Result<u64, WatchError> {
        let started = Instant::now();
        let mut last_size: Option<u64> = None;

        loop {
            match tokio::fs::metadata(path).await {
                Ok(meta) => {
                    let size = meta.len();
                    if last_size == Some(size) {
                        debug!(
                            "✅ {} stable at {} bytes after {:?}",
                            path.display(),
                            size,
                            started.elapsed()
                        );
                        return Ok(size);
                    }
                    trace!("{} is {} bytes", path.display(), size);
                    last_size = Some(size);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    trace!("{} not present yet", path.display());
                }
                Err(e) => return Err(e.into()),
            }

            if started.elapsed() > self.timeout {
                return Err(WatchError::Timeout {
                    path: path.to_path_buf(),
                    timeout: self.timeout,
                });
            }

            sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    fn fast_watcher(timeout_ms: u64) -> CompletionWatcher {
        CompletionWatcher::new(Duration::from_millis(20), Duration::from_millis(timeout_ms))
    }

    #[tokio::test]
    async fn test_stable_file_completes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.webm");
        tokio::fs::write(&path, vec![7u8; 4096]).await.unwrap();

        let size = fast_watcher(2_000).wait_for_stable(&path).await.unwrap();
        assert_eq!(size, 4096);
    }

    #[tokio::test]
    async fn test_needs_two_samples_one_interval_apart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.webm");
        tokio::fs::write(&path, b"abc").await.unwrap();

        let watcher = CompletionWatcher::new(Duration::from_millis(100), Duration::from_secs(5));
        let started = std::time::Instant::now();
        watcher.wait_for_stable(&path).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_missing_file_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.webm");

        let err = fast_watcher(150).wait_for_stable(&path).await.unwrap_err();
        assert!(matches!(err, WatchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_growing_file_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growing.webm");
        let mut file = tokio::fs::File::create(&path).await.unwrap();

        let writer = tokio::spawn(async move {
            for _ in 0..200 {
                file.write_all(&[1u8; 512]).await.unwrap();
                file.flush().await.unwrap();
                sleep(Duration::from_millis(5)).await;
            }
        });

        let err = fast_watcher(200).wait_for_stable(&path).await.unwrap_err();
        assert!(matches!(err, WatchError::Timeout { .. }));
        writer.abort();
    }

    #[tokio::test]
    async fn test_file_appearing_late_completes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.webm");
        let target = path.clone();

        tokio::spawn(async move {
            sleep(Duration::from_millis(60)).await;
            tokio::fs::write(&target, b"late bytes").await.unwrap();
        });

        let size = fast_watcher(2_000).wait_for_stable(&path).await.unwrap();
        assert_eq!(size, 10);
    }
}
