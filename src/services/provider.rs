use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to run yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),

    /// Non-zero exit; `message` is the most relevant stderr line
    #[error("{message}")]
    Failed { code: Option<i32>, message: String },

    #[error("Unexpected yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("yt-dlp did not report an output file")]
    MissingFilename,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// One video as described by the metadata provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
}

/// A file written to local storage by the media fetcher
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub path: PathBuf,
    pub title: String,
}

/// Search and fetch backend for a video platform
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Resolve a free-text query to at most `limit` entries
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProviderEntry>, ProviderError>;

    /// Download the best audio stream of `url` into `dest_dir`
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<FetchedMedia, ProviderError>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;
}
