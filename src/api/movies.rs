use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use super::types::{HomeDto, MovieVideosDto, VideoDto};
use crate::clients::tmdb::{MovieDetails, MoviePage, TrendingWindow};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    pub genre_id: i64,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub window: Option<String>,
}

/// Landing-page payload: popular movies and the genre list are fetched
/// concurrently and joined before responding.
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<HomeDto>>, ApiError> {
    let tmdb = &state.shared.tmdb;

    let (popular, genres) = tokio::try_join!(tmdb.popular(1), tmdb.genres())?;

    Ok(Json(ApiResponse::success(HomeDto {
        popular,
        genres: genres.genres,
    })))
}

pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<MoviePage>>, ApiError> {
    let page = state.shared.tmdb.popular(query.page.unwrap_or(1)).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<ApiResponse<MoviePage>>, ApiError> {
    let window = match query.window.as_deref() {
        Some("day") => TrendingWindow::Day,
        _ => TrendingWindow::Week,
    };
    let page = state.shared.tmdb.trending(window).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<MoviePage>>, ApiError> {
    let page = state.shared.tmdb.top_rated(query.page.unwrap_or(1)).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn now_playing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<MoviePage>>, ApiError> {
    let page = state.shared.tmdb.now_playing(query.page.unwrap_or(1)).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn upcoming(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<MoviePage>>, ApiError> {
    let page = state.shared.tmdb.upcoming(query.page.unwrap_or(1)).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn discover(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DiscoverQuery>,
) -> Result<Json<ApiResponse<MoviePage>>, ApiError> {
    let page = state
        .shared
        .tmdb
        .movies_by_genre(query.genre_id, query.page.unwrap_or(1))
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<crate::clients::tmdb::Genre>>>, ApiError> {
    let list = state.shared.tmdb.genres().await?;
    Ok(Json(ApiResponse::success(list.genres)))
}

pub async fn movie_details(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<Json<ApiResponse<MovieDetails>>, ApiError> {
    let details = state.shared.tmdb.movie_details(movie_id).await?;
    Ok(Json(ApiResponse::success(details)))
}

/// Trailer and review videos for one movie, resolved concurrently through
/// the ordered-fallback lookup. Finding nothing is a normal empty body,
/// never an error.
pub async fn movie_videos(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<Json<ApiResponse<MovieVideosDto>>, ApiError> {
    let details = state.shared.tmdb.movie_details(movie_id).await?;

    let year = details
        .release_date
        .get(..4)
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()));

    let videos = &state.shared.video_service;
    let (trailers, reviews) = tokio::join!(
        videos.find_trailers(&details.title, year),
        videos.find_reviews(&details.title, year),
    );

    Ok(Json(ApiResponse::success(MovieVideosDto {
        trailers: trailers.items.iter().map(VideoDto::from).collect(),
        reviews: reviews.items.iter().map(VideoDto::from).collect(),
    })))
}
