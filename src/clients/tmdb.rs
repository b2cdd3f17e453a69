use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ClientError, MovieSearch};
use crate::config::TmdbConfig;

const SERVICE: &str = "TMDB";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl Movie {
    /// Four-digit release year, if the upstream date is well-formed.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        let year = self.release_date.get(..4)?;
        year.chars().all(|c| c.is_ascii_digit()).then_some(year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl MoviePage {
    /// The payload returned for "no query": a valid, explicitly empty page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub enum TrendingWindow {
    Day,
    Week,
}

impl TrendingWindow {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    #[must_use]
    pub const fn new(client: Client, config: TmdbConfig) -> Self {
        Self { client, config }
    }

    /// Issues one GET against the given endpoint, appending the API key
    /// and language parameters. Non-success statuses and transport
    /// failures are classified, never swallowed.
    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, ClientError> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}api_key={}&language={}",
            self.config.base_url, endpoint, separator, self.config.api_key, self.config.language
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::Transport {
                service: SERVICE,
                source,
            })
    }

    pub async fn popular(&self, page: u32) -> Result<MoviePage, ClientError> {
        self.fetch(&format!("/movie/popular?page={page}")).await
    }

    pub async fn trending(&self, window: TrendingWindow) -> Result<MoviePage, ClientError> {
        self.fetch(&format!("/trending/movie/{}", window.as_str()))
            .await
    }

    pub async fn top_rated(&self, page: u32) -> Result<MoviePage, ClientError> {
        self.fetch(&format!("/movie/top_rated?page={page}")).await
    }

    pub async fn now_playing(&self, page: u32) -> Result<MoviePage, ClientError> {
        self.fetch(&format!("/movie/now_playing?page={page}")).await
    }

    pub async fn upcoming(&self, page: u32) -> Result<MoviePage, ClientError> {
        self.fetch(&format!("/movie/upcoming?page={page}")).await
    }

    pub async fn genres(&self) -> Result<GenreList, ClientError> {
        self.fetch("/genre/movie/list").await
    }

    pub async fn movies_by_genre(
        &self,
        genre_id: i64,
        page: u32,
    ) -> Result<MoviePage, ClientError> {
        self.fetch(&format!("/discover/movie?with_genres={genre_id}&page={page}"))
            .await
    }

    pub async fn movie_details(&self, movie_id: i64) -> Result<MovieDetails, ClientError> {
        self.fetch(&format!("/movie/{movie_id}")).await
    }

    /// Joins a relative image path from the API with the image host and a
    /// width token to form a displayable URL.
    #[must_use]
    pub fn image_url(&self, path: &str, size: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        format!("{}/{}{}", self.config.image_base_url, size, path)
    }
}

#[async_trait]
impl MovieSearch for TmdbClient {
    async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage, ClientError> {
        self.fetch(&format!(
            "/search/movie?query={}&page={page}",
            urlencoding::encode(query)
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        TmdbClient::new(Client::new(), TmdbConfig::default())
    }

    #[test]
    fn test_image_url_joins_host_size_and_path() {
        let url = client().image_url("/abc123.jpg", "w500");
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/abc123.jpg");
    }

    #[test]
    fn test_image_url_empty_path() {
        assert_eq!(client().image_url("", "w500"), "");
    }

    #[test]
    fn test_release_year() {
        let movie: Movie = serde_json::from_value(serde_json::json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-31"
        }))
        .unwrap();
        assert_eq!(movie.release_year(), Some("1999"));
    }

    #[test]
    fn test_release_year_missing_date() {
        let movie: Movie = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Untitled"
        }))
        .unwrap();
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_movie_page_deserializes_upstream_shape() {
        let page: MoviePage = serde_json::from_str(
            r#"{
                "page": 1,
                "results": [{
                    "id": 603,
                    "title": "The Matrix",
                    "overview": "A hacker learns the truth.",
                    "poster_path": "/p.jpg",
                    "backdrop_path": null,
                    "release_date": "1999-03-31",
                    "vote_average": 8.2,
                    "genre_ids": [28, 878]
                }],
                "total_pages": 1,
                "total_results": 1
            }"#,
        )
        .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title, "The Matrix");
        assert_eq!(page.results[0].genre_ids, vec![28, 878]);
    }
}
