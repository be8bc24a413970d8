//! yt-dlp subprocess backend for [`MediaProvider`].

use crate::config::AppConfig;
use crate::services::provider::{FetchedMedia, MediaProvider, ProviderEntry, ProviderError};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

/// Output template relative to the downloads directory
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

pub struct YtDlpProvider {
    binary: PathBuf,
    cookies: Option<PathBuf>,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct SearchPlaylist {
    #[serde(default)]
    entries: Vec<Option<ProviderEntry>>,
}

#[derive(Debug, Deserialize)]
struct RequestedDownload {
    #[serde(default)]
    filepath: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FetchInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    requested_downloads: Vec<RequestedDownload>,
    #[serde(default, rename = "_filename")]
    prepared_filename: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

impl YtDlpProvider {
    pub fn new(binary: PathBuf, cookies: Option<PathBuf>, user_agent: String) -> Self {
        Self {
            binary,
            cookies,
            user_agent,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.ytdlp_path.clone(),
            config.cookies_file.clone(),
            config.user_agent.clone(),
        )
    }

    /// Flags shared by every invocation: certificate checks off, cookies, UA
    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--no-check-certificates", "--no-warnings", "--ignore-config"]);
        if let Some(cookies) = &self.cookies {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg("--add-header")
            .arg(format!("User-Agent:{}", self.user_agent));
        cmd.kill_on_drop(true);
        cmd
    }

    fn build_search_command(&self, query: &str, limit: usize) -> Command {
        let mut cmd = self.base_command();
        cmd.args(["--dump-single-json", "--skip-download", "--prefer-free-formats"])
            .arg("--")
            .arg(search_target(query, limit));
        cmd
    }

    /// The target comes from the client; `--` keeps it from being read as an option
    fn build_fetch_command(&self, url: &str, dest_dir: &Path) -> Command {
        let mut cmd = self.base_command();
        cmd.args([
            "--format",
            "bestaudio/best",
            "--no-part",
            "--no-playlist",
            "--no-simulate",
            "--dump-single-json",
        ])
        .arg("--output")
        .arg(dest_dir.join(OUTPUT_TEMPLATE))
        .arg("--")
        .arg(url);
        cmd
    }

    async fn run(mut cmd: Command) -> Result<Output, ProviderError> {
        let output = cmd.output().await?;
        if !output.status.success() {
            let message = stderr_summary(&output.stderr);
            debug!("yt-dlp stderr: {}", String::from_utf8_lossy(&output.stderr));
            return Err(ProviderError::Failed {
                code: output.status.code(),
                message,
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl MediaProvider for YtDlpProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProviderEntry>, ProviderError> {
        let cmd = self.build_search_command(query, limit);
        let output = Self::run(cmd).await?;
        let entries = parse_search_output(&output.stdout, limit)?;
        info!("🔎 yt-dlp returned {} entries for {:?}", entries.len(), query);
        Ok(entries)
    }

    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<FetchedMedia, ProviderError> {
        let cmd = self.build_fetch_command(url, dest_dir);

        info!("⬇️  Fetching {}", url);
        let output = Self::run(cmd).await?;
        let media = parse_fetch_output(&output.stdout)?;
        info!("📦 Fetched {:?} -> {}", media.title, media.path.display());
        Ok(media)
    }

    async fn health_check(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// `ytsearchN:` prefix understood by yt-dlp's default search
pub(crate) fn search_target(query: &str, limit: usize) -> String {
    format!("ytsearch{}:{}", limit, query)
}

pub(crate) fn parse_search_output(
    stdout: &[u8],
    limit: usize,
) -> Result<Vec<ProviderEntry>, ProviderError> {
    let playlist: SearchPlaylist = serde_json::from_slice(stdout)?;
    Ok(playlist.entries.into_iter().flatten().take(limit).collect())
}

pub(crate) fn parse_fetch_output(stdout: &[u8]) -> Result<FetchedMedia, ProviderError> {
    let info: FetchInfo = serde_json::from_slice(stdout)?;

    let path = info
        .requested_downloads
        .into_iter()
        .find_map(|d| d.filepath)
        .or(info.prepared_filename)
        .or(info.filename)
        .ok_or(ProviderError::MissingFilename)?;

    Ok(FetchedMedia {
        path: PathBuf::from(path),
        title: info.title.unwrap_or_default(),
    })
}

/// Pick the last `ERROR:` line from stderr, or the last non-empty line
pub(crate) fn stderr_summary(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or(lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp exited without output".to_string())
}
