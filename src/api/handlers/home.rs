use crate::AppState;
use crate::api::error::AppError;
use crate::services::library::list_stored_files;
use axum::{extract::State, response::Html};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "HTML page listing the downloads folder", content_type = "text/html")
    ),
    tag = "pages"
)]
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let files = list_stored_files(&state.config.downloads_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list downloads: {}", e)))?;

    let page = state
        .templates
        .render_index(&files)
        .map_err(|e| AppError::Internal(format!("Failed to render page: {}", e)))?;

    Ok(Html(page))
}
