use crate::api::error::AppError;
use crate::models::DownloadRequest;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Longest id accepted before building a watch URL
const MAX_VIDEO_ID_LEN: usize = 64;

/// Trim a search query and reject it when nothing is left
pub fn validate_query(query: &str) -> Result<&str, AppError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Missing search query".to_string()));
    }
    Ok(trimmed)
}

/// Video ids are URL-safe base64-ish tokens
pub fn validate_video_id(id: &str) -> Result<&str, AppError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_VIDEO_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !valid {
        tracing::warn!("Rejected malformed video id: {:?}", id);
        return Err(AppError::Validation(format!("Invalid video id: {}", id)));
    }
    Ok(id)
}

/// Turn a download request into the URL handed to the fetcher.
///
/// An `id` wins over `query`; blank fields count as absent.
pub fn resolve_video_url(req: &DownloadRequest) -> Result<String, AppError> {
    let id = req.id.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let query = req.query.as_deref().map(str::trim).filter(|s| !s.is_empty());

    match (id, query) {
        (Some(id), _) => Ok(format!("{}{}", WATCH_URL_PREFIX, validate_video_id(id)?)),
        (None, Some(query)) => Ok(query.to_string()),
        (None, None) => Err(AppError::Validation(
            "No video selected".to_string(),
        )),
    }
}

/// Build a `Content-Disposition` value with an ASCII fallback and a UTF-8 name
pub fn attachment_disposition(filename: &str) -> String {
    let ascii_filename = filename
        .chars()
        .filter(|c| c.is_ascii() && !c.is_control() && *c != '"' && *c != '\\' && *c != ';')
        .take(128)
        .collect::<String>();
    let fallback_filename = if ascii_filename.trim().is_empty() {
        "audio.mp3"
    } else {
        &ascii_filename
    };

    let encoded_filename = utf8_percent_encode(filename, NON_ALPHANUMERIC).to_string();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback_filename, encoded_filename
    )
}

/// Header-safe form of a video title
pub fn encode_header_value(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
