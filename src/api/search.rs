use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, types::SearchResultsDto};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
}

/// Cache-through movie search. An empty or whitespace-only query returns
/// an empty page without touching the cache or the upstream; an upstream
/// failure becomes a 502 so the frontend can offer a retry.
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    let page = state.shared.search_service.search(&request.q).await?;

    Ok(Json(ApiResponse::success(SearchResultsDto {
        query: request.q,
        page,
    })))
}
