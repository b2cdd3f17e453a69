use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use caritahu::clients::tmdb::{Movie, MoviePage, TmdbClient};
use caritahu::clients::youtube::{
    VideoDefinition, VideoDuration, VideoSearchResponse, YoutubeClient,
};
use caritahu::clients::{ClientError, MovieSearch, VideoSearch};
use caritahu::config::Config;
use caritahu::db::Store;
use caritahu::services::{ReviewService, SearchService, VideoLookupService};
use caritahu::state::SharedState;

/// Fixed search payload so tests never reach the real movie API.
struct StubMovieSearch;

#[async_trait]
impl MovieSearch for StubMovieSearch {
    async fn search_movies(&self, query: &str, _page: u32) -> Result<MoviePage, ClientError> {
        if query == "nothing here" {
            return Ok(MoviePage::empty());
        }
        Ok(MoviePage {
            page: 1,
            results: vec![Movie {
                id: 603,
                title: "The Matrix".to_string(),
                overview: "A hacker learns the truth.".to_string(),
                poster_path: Some("/p.jpg".to_string()),
                backdrop_path: None,
                release_date: "1999-03-31".to_string(),
                vote_average: 8.2,
                genre_ids: vec![28, 878],
            }],
            total_pages: 1,
            total_results: 1,
        })
    }
}

struct StubVideoSearch;

#[async_trait]
impl VideoSearch for StubVideoSearch {
    async fn search_videos(
        &self,
        _query: &str,
        _max_results: u8,
        _duration: Option<VideoDuration>,
        _definition: Option<VideoDefinition>,
    ) -> Result<VideoSearchResponse, ClientError> {
        Ok(VideoSearchResponse::empty())
    }
}

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("caritahu-api-test-{}.db", uuid::Uuid::new_v4()));
    let config = Config::default();

    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open temp store");

    let http = reqwest::Client::new();
    let tmdb = Arc::new(TmdbClient::new(http.clone(), config.tmdb.clone()));
    let youtube = Arc::new(YoutubeClient::new(http, config.youtube.clone()));

    let search_service = Arc::new(SearchService::new(
        store.clone(),
        Arc::new(StubMovieSearch),
        &config.cache,
    ));
    let video_service = Arc::new(VideoLookupService::new(Arc::new(StubVideoSearch)));
    let review_service = Arc::new(ReviewService::new(store.clone()));

    let shared = Arc::new(SharedState {
        config,
        store,
        tmdb,
        youtube,
        search_service,
        video_service,
        review_service,
    });

    let state = caritahu::api::create_app_state(shared, None);
    caritahu::api::router(state)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_search_returns_results() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=The%20Matrix")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["query"], "The Matrix");
    assert_eq!(body["data"]["results"][0]["title"], "The Matrix");
    assert_eq!(body["data"]["total_results"], 1);
}

#[tokio::test]
async fn test_search_empty_query_returns_empty_page() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=%20%20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_search_no_matches_is_a_valid_empty_page() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/search?q=nothing%20here")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_review_round_trip() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "user_name": "andi",
        "rating": 5,
        "review_text": "Film terbaik tahun ini"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies/603/reviews")
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    assert_eq!(created["data"]["user_name"], "andi");
    assert_eq!(created["data"]["helpful_count"], 0);
    let review_id = created["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(&format!("/api/movies/603/reviews/{review_id}/helpful"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/movies/603/reviews")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let reviews = body["data"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["helpful_count"], 1);
}

#[tokio::test]
async fn test_submit_review_invalid_rating_is_rejected() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "user_name": "budi",
        "rating": 9,
        "review_text": "terlalu bagus"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies/603/reviews")
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_mark_helpful_unknown_review_is_404() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies/603/reviews/9999/helpful")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["database_ok"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
