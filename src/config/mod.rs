use anyhow::{Result, bail};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Runtime configuration for the download service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding transient fetched and converted files (default: "downloads")
    pub downloads_dir: PathBuf,

    /// Netscape cookie file handed to yt-dlp (default: "cookies.txt")
    pub cookies_file: Option<PathBuf>,

    /// yt-dlp executable (default: "yt-dlp" from PATH)
    pub ytdlp_path: PathBuf,

    /// ffmpeg executable (default: "ffmpeg" from PATH)
    pub ffmpeg_path: PathBuf,

    /// Maximum number of search results (default: 5)
    pub search_limit: usize,

    /// How long to wait for a fetched file to stop growing (default: 60s)
    pub download_timeout_secs: u64,

    /// Polling interval of the completion watcher (default: 1000ms)
    pub watch_interval_ms: u64,

    /// MP3 bitrate passed to ffmpeg (default: "192k")
    pub audio_bitrate: String,

    /// User-Agent header sent by yt-dlp
    pub user_agent: String,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
            cookies_file: Some(PathBuf::from("cookies.txt")),
            ytdlp_path: PathBuf::from("yt-dlp"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            search_limit: 5,
            download_timeout_secs: 60,
            watch_interval_ms: 1000,
            audio_bitrate: "192k".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_origins: vec![
                "http://localhost:9090".to_string(),
                "http://127.0.0.1:9090".to_string(),
            ],
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            downloads_dir: env::var("DOWNLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.downloads_dir),

            cookies_file: match env::var("COOKIES_FILE") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(PathBuf::from(v)),
                Err(_) => default.cookies_file,
            },

            ytdlp_path: env::var("YTDLP_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.ytdlp_path),

            ffmpeg_path: env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.ffmpeg_path),

            search_limit: env_or("SEARCH_LIMIT", default.search_limit),

            download_timeout_secs: env_or("DOWNLOAD_TIMEOUT_SECS", default.download_timeout_secs),

            watch_interval_ms: env_or("WATCH_INTERVAL_MS", default.watch_interval_ms),

            audio_bitrate: env::var("AUDIO_BITRATE").unwrap_or(default.audio_bitrate),

            user_agent: env::var("USER_AGENT").unwrap_or(default.user_agent),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development (no cookies, permissive CORS)
    pub fn development() -> Self {
        Self {
            cookies_file: None,
            allowed_origins: vec!["*".to_string()],
            ..Self::default()
        }
    }

    /// Check limits and drop a cookie file that does not exist.
    ///
    /// The downloads directory itself is created by
    /// [`crate::infrastructure::storage::setup_storage`].
    pub fn validate(mut self) -> Result<Self> {
        if self.search_limit == 0 {
            bail!("SEARCH_LIMIT must be greater than zero");
        }
        if self.download_timeout_secs == 0 {
            bail!("DOWNLOAD_TIMEOUT_SECS must be greater than zero");
        }
        if self.watch_interval_ms == 0 {
            bail!("WATCH_INTERVAL_MS must be greater than zero");
        }
        if self.audio_bitrate.trim().is_empty() {
            bail!("AUDIO_BITRATE must not be empty");
        }

        if let Some(cookies) = &self.cookies_file {
            if !cookies.is_file() {
                tracing::warn!(
                    "⚠️  Cookie file {} not found, continuing without cookies",
                    cookies.display()
                );
                self.cookies_file = None;
            }
        }

        Ok(self)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.download_timeout(), Duration::from_secs(60));
        assert_eq!(config.watch_interval(), Duration::from_secs(1));
        assert_eq!(config.audio_bitrate, "192k");
        assert_eq!(config.downloads_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn test_development_config() {
        let config = AppConfig::development();
        assert!(config.cookies_file.is_none());
        assert_eq!(config.allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.search_limit, 5);
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = AppConfig {
            search_limit: 0,
            ..AppConfig::development()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            download_timeout_secs: 0,
            ..AppConfig::development()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            watch_interval_ms: 0,
            ..AppConfig::development()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_drops_missing_cookie_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            cookies_file: Some(dir.path().join("missing-cookies.txt")),
            ..AppConfig::development()
        };
        let config = config.validate().unwrap();
        assert!(config.cookies_file.is_none());
    }

    #[test]
    fn test_validate_keeps_existing_cookie_file() {
        let dir = tempfile::tempdir().unwrap();
        let cookies = dir.path().join("cookies.txt");
        std::fs::write(&cookies, "# Netscape HTTP Cookie File\n").unwrap();

        let config = AppConfig {
            cookies_file: Some(cookies.clone()),
            ..AppConfig::development()
        };
        let config = config.validate().unwrap();
        assert_eq!(config.cookies_file, Some(cookies));
    }
}
