use crate::AppState;
use crate::api::error::AppError;
use crate::models::{SearchRequest, SearchResponse, SearchResult};
use crate::utils::validation::validate_query;
use axum::{Json, extract::State};
use tracing::info;

#[utoipa::path(
    post,
    path = "/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching videos", body = SearchResponse),
        (status = 400, description = "Empty query", body = crate::models::MessageResponse),
        (status = 502, description = "Metadata provider failed", body = crate::models::MessageResponse)
    ),
    tag = "media"
)]
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = validate_query(&req.query)?;
    let limit = state.config.search_limit;

    info!("🔎 Searching {:?} (limit {})", query, limit);
    let entries = state.provider.search(query, limit).await?;

    let videos: Vec<SearchResult> = entries
        .into_iter()
        .take(limit)
        .map(SearchResult::from)
        .collect();

    Ok(Json(SearchResponse { videos }))
}
