use crate::config::AppConfig;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("failed to start converter: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("converter exited with code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("converter produced no output at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Transcodes a fetched media file to MP3
#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;

    async fn health_check(&self) -> bool;
}

pub struct FfmpegConverter {
    binary: PathBuf,
    bitrate: String,
}

impl FfmpegConverter {
    pub fn new(binary: PathBuf, bitrate: String) -> Self {
        Self { binary, bitrate }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ffmpeg_path.clone(), config.audio_bitrate.clone())
    }

    fn build_command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-nostdin", "-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(input)
            .args(["-vn", "-c:a", "libmp3lame", "-b:a", self.bitrate.as_str()])
            .arg(output);
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        info!("🎧 Converting {} -> {}", input.display(), output.display());

        let result = self.build_command(input, output).output().await?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            return Err(ConversionError::Failed {
                code: result.status.code(),
                stderr,
            });
        }

        if tokio::fs::metadata(output).await.is_err() {
            return Err(ConversionError::MissingOutput(output.to_path_buf()));
        }

        debug!("✔ Conversion finished: {}", output.display());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// Destination of the converted file: same stem, `.mp3` extension
pub fn mp3_path_for(source: &Path) -> PathBuf {
    source.with_extension("mp3")
}
