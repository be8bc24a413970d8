use crate::config::AppConfig;
use crate::services::converter::{AudioConverter, FfmpegConverter};
use crate::services::provider::MediaProvider;
use crate::services::ytdlp::YtDlpProvider;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn setup_provider(config: &AppConfig) -> Arc<dyn MediaProvider> {
    let provider = YtDlpProvider::from_config(config);

    if provider.health_check().await {
        info!("🎬 yt-dlp found at {}", config.ytdlp_path.display());
    } else {
        warn!(
            "⚠️  yt-dlp not runnable at {}! Search and download will fail.",
            config.ytdlp_path.display()
        );
    }
    match &config.cookies_file {
        Some(cookies) => info!("🍪 Using cookies from {}", cookies.display()),
        None => info!("🍪 No cookie file configured"),
    }

    Arc::new(provider)
}

pub async fn setup_converter(config: &AppConfig) -> Arc<dyn AudioConverter> {
    let converter = FfmpegConverter::from_config(config);

    if converter.health_check().await {
        info!(
            "🎧 ffmpeg found at {} (bitrate {})",
            config.ffmpeg_path.display(),
            config.audio_bitrate
        );
    } else {
        warn!(
            "⚠️  ffmpeg not runnable at {}! Downloads will fail at conversion.",
            config.ffmpeg_path.display()
        );
    }

    Arc::new(converter)
}
