use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub yt_dlp: String,
    pub ffmpeg: String,
    pub storage: String,
    pub version: String,
}

fn label(ok: bool, up: &str, down: &str) -> String {
    if ok { up } else { down }.to_string()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (yt_dlp, ffmpeg) = tokio::join!(
        state.provider.health_check(),
        state.converter.health_check()
    );

    let storage = tokio::fs::metadata(&state.config.downloads_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    let status = if yt_dlp && ffmpeg && storage {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        yt_dlp: label(yt_dlp, "available", "missing"),
        ffmpeg: label(ffmpeg, "available", "missing"),
        storage: label(storage, "ready", "missing"),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
