use crate::api::error::AppError;
use crate::services::converter::{AudioConverter, mp3_path_for};
use crate::services::provider::MediaProvider;
use crate::services::watcher::CompletionWatcher;
use crate::utils::cleanup::FileGuard;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// A converted MP3 ready to stream; the file is removed when `file` drops
#[derive(Debug)]
pub struct ConvertedAudio {
    pub file: FileGuard,
    pub file_name: String,
    pub title: String,
    pub size: u64,
}

/// Fetch, wait, convert, clean up.
pub struct DownloadService {
    provider: Arc<dyn MediaProvider>,
    converter: Arc<dyn AudioConverter>,
    watcher: CompletionWatcher,
    storage_dir: PathBuf,
}

impl DownloadService {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        converter: Arc<dyn AudioConverter>,
        watcher: CompletionWatcher,
        storage_dir: PathBuf,
    ) -> Self {
        Self {
            provider,
            converter,
            watcher,
            storage_dir,
        }
    }

    pub async fn download(&self, url: &str) -> Result<ConvertedAudio, AppError> {
        // 1-2. Fetch and resolve the written file
        let fetched = self.provider.fetch(url, &self.storage_dir).await?;
        let original = FileGuard::new(&fetched.path);

        // 3. Make sure the fetcher is done writing
        let size = self.watcher.wait_for_stable(original.path()).await?;
        info!(
            "📥 {} complete ({} bytes)",
            original.path().display(),
            size
        );

        let target = mp3_path_for(original.path());
        let converted = if target.as_path() == original.path() {
            info!("Fetched file is already MP3, skipping conversion");
            FileGuard::new(original.disarm())
        } else {
            // 4. Convert; the guard removes a partial output on failure
            let converted = FileGuard::new(&target);
            let result = self
                .converter
                .convert(original.path(), converted.path())
                .await;

            // 5. The fetched file goes away whatever the outcome
            if let Err(e) = original.remove().await {
                warn!("Failed to remove fetched file: {}", e);
            }

            result?;
            converted
        };

        let size = tokio::fs::metadata(converted.path())
            .await
            .map_err(|_| {
                AppError::NotFound(format!(
                    "Converted file {} not found",
                    converted.path().display()
                ))
            })?
            .len();

        let file_name = converted
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.mp3".to_string());

        Ok(ConvertedAudio {
            file: converted,
            file_name,
            title: fetched.title,
            size,
        })
    }
}
