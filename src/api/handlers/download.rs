use crate::AppState;
use crate::api::error::AppError;
use crate::models::DownloadRequest;
use crate::utils::validation::{attachment_disposition, encode_header_value, resolve_video_url};
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use futures::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::info;

pub const VIDEO_TITLE_HEADER: &str = "x-video-title";

#[utoipa::path(
    post,
    path = "/download",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Converted MP3 stream", content_type = "audio/mpeg"),
        (status = 400, description = "Neither id nor query given", body = crate::models::MessageResponse),
        (status = 404, description = "Converted file missing", body = crate::models::MessageResponse),
        (status = 500, description = "Conversion failed", body = crate::models::MessageResponse),
        (status = 502, description = "Fetch failed", body = crate::models::MessageResponse),
        (status = 504, description = "Download never completed", body = crate::models::MessageResponse)
    ),
    tag = "media"
)]
pub async fn download(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<Response, AppError> {
    let url = resolve_video_url(&req)?;
    let audio = state.downloads.download(&url).await?;

    let file = tokio::fs::File::open(audio.file.path())
        .await
        .map_err(|e| AppError::NotFound(format!("{}: {}", audio.file_name, e)))?;

    info!(
        "📤 Streaming {} ({} bytes)",
        audio.file_name, audio.size
    );

    // The guard rides along with the body and deletes the file once it drops
    let guard = audio.file;
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _keep = &guard;
        chunk
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::CONTENT_LENGTH, audio.size)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&audio.file_name),
        )
        .header(VIDEO_TITLE_HEADER, encode_header_value(&audio.title))
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))
}
