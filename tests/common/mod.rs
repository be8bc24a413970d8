#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use yt_audio_backend::config::AppConfig;
use yt_audio_backend::services::converter::{AudioConverter, ConversionError};
use yt_audio_backend::services::provider::{
    FetchedMedia, MediaProvider, ProviderEntry, ProviderError, Thumbnail,
};
use yt_audio_backend::{AppState, create_app};

pub const FETCHED_BYTES: &[u8] = b"webm-audio-payload";

#[derive(Default)]
pub struct MockProvider {
    pub entries: Vec<ProviderEntry>,
    pub search_error: Option<String>,
    pub fetch_error: Option<String>,
    /// Report a file that is never written
    pub fetch_phantom: bool,
    pub title: String,
    pub search_calls: AtomicUsize,
    pub fetched_urls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn with_entries(count: usize) -> Self {
        Self {
            entries: (0..count).map(entry).collect(),
            title: "Lofi Song".to_string(),
            ..Default::default()
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched_urls.lock().unwrap().clone()
    }
}

pub fn entry(i: usize) -> ProviderEntry {
    ProviderEntry {
        id: format!("vid{}", i),
        title: Some(format!("Lofi Beats {}", i)),
        thumbnail: None,
        thumbnails: vec![
            Thumbnail {
                url: format!("https://i.ytimg.com/vi/vid{}/default.jpg", i),
            },
            Thumbnail {
                url: format!("https://i.ytimg.com/vi/vid{}/maxresdefault.jpg", i),
            },
        ],
        duration: Some(120.0 + i as f64),
        uploader: Some("Lofi Girl".to_string()),
    }
}

#[async_trait]
impl MediaProvider for MockProvider {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<ProviderEntry>, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.search_error {
            return Err(ProviderError::Failed {
                code: Some(1),
                message: message.clone(),
            });
        }
        // Ignores the limit on purpose so the handler bound is exercised
        let _ = limit;
        Ok(self.entries.clone())
    }

    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<FetchedMedia, ProviderError> {
        self.fetched_urls.lock().unwrap().push(url.to_string());
        if let Some(message) = &self.fetch_error {
            return Err(ProviderError::Failed {
                code: Some(1),
                message: message.clone(),
            });
        }

        let path = dest_dir.join(format!("{}.webm", self.title));
        if !self.fetch_phantom {
            tokio::fs::write(&path, FETCHED_BYTES).await?;
        }
        Ok(FetchedMedia {
            path,
            title: self.title.clone(),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Prefixes the input with a marker instead of transcoding
#[derive(Default)]
pub struct MockConverter {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl AudioConverter for MockConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ConversionError::Failed {
                code: Some(1),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        let mut data = b"MP3:".to_vec();
        data.extend(tokio::fs::read(input).await?);
        tokio::fs::write(output, data).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        downloads_dir: dir.to_path_buf(),
        watch_interval_ms: 10,
        download_timeout_secs: 1,
        ..AppConfig::development()
    }
}

pub fn setup_app(
    dir: &Path,
    provider: Arc<MockProvider>,
    converter: Arc<MockConverter>,
) -> Router {
    let state = AppState::new(test_config(dir), provider, converter).unwrap();
    create_app(state)
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
