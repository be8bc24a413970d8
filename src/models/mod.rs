use crate::services::provider::ProviderEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    /// Length in seconds
    pub duration: Option<f64>,
    pub uploader: Option<String>,
}

impl From<ProviderEntry> for SearchResult {
    fn from(entry: ProviderEntry) -> Self {
        // yt-dlp orders thumbnails from smallest to largest
        let thumbnail = entry
            .thumbnails
            .last()
            .map(|t| t.url.clone())
            .or(entry.thumbnail);

        Self {
            id: entry.id,
            title: entry.title.unwrap_or_default(),
            thumbnail,
            duration: entry.duration,
            uploader: entry.uploader,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub videos: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DownloadRequest {
    /// Video id, resolved to a watch URL
    pub id: Option<String>,
    /// Raw URL handed to yt-dlp when no id is given
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredFile {
    pub name: String,
    pub size_bytes: u64,
    pub size_label: String,
    pub modified: Option<DateTime<Utc>>,
}
