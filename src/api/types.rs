use serde::Serialize;

use crate::clients::tmdb::{Genre, MoviePage};
use crate::clients::youtube::{VideoItem, YoutubeClient};
use crate::db::Review;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResultsDto {
    /// The query as the user typed it; cache keys use the normalized form.
    pub query: String,
    #[serde(flatten)]
    pub page: MoviePage,
}

#[derive(Debug, Serialize)]
pub struct VideoDto {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel: String,
    pub published_at: String,
    pub thumbnail: String,
    pub watch_url: String,
    pub embed_url: String,
}

impl From<&VideoItem> for VideoDto {
    fn from(item: &VideoItem) -> Self {
        Self {
            video_id: item.id.video_id.clone(),
            title: item.snippet.title.clone(),
            description: item.snippet.description.clone(),
            channel: item.snippet.channel_title.clone(),
            published_at: item.snippet.published_at.clone(),
            thumbnail: item.thumbnail_url().to_string(),
            watch_url: YoutubeClient::watch_url(&item.id.video_id),
            embed_url: YoutubeClient::embed_url(&item.id.video_id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieVideosDto {
    pub trailers: Vec<VideoDto>,
    pub reviews: Vec<VideoDto>,
}

#[derive(Debug, Serialize)]
pub struct HomeDto {
    pub popular: MoviePage,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    pub movie_id: i64,
    pub user_name: String,
    pub rating: i32,
    pub review_text: String,
    pub helpful_count: i32,
    pub created_at: String,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            movie_id: review.movie_id,
            user_name: review.user_name,
            rating: review.rating,
            review_text: review.review_text,
            helpful_count: review.helpful_count,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub database_ok: bool,
    pub uptime_seconds: u64,
}
