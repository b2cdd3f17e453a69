use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::types::ReviewDto;
use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub user_name: String,
    pub rating: i32,
    pub review_text: String,
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state.shared.review_service.list_for_movie(movie_id).await?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from).collect(),
    )))
}

pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let review = state
        .shared
        .review_service
        .submit(movie_id, &request.user_name, request.rating, &request.review_text)
        .await?;

    info!("New review for movie {} by '{}'", movie_id, review.user_name);

    Ok(Json(ApiResponse::success(ReviewDto::from(review))))
}

pub async fn mark_helpful(
    State(state): State<Arc<AppState>>,
    Path((_movie_id, review_id)): Path<(i64, i32)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.shared.review_service.mark_helpful(review_id).await?;
    Ok(Json(ApiResponse::success(())))
}
