use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ClientError, VideoSearch};
use crate::config::YoutubeConfig;

const SERVICE: &str = "YouTube";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: VideoId,
    pub snippet: VideoSnippet,
}

impl VideoItem {
    /// Best available thumbnail, preferring the medium variant.
    #[must_use]
    pub fn thumbnail_url(&self) -> &str {
        self.snippet
            .thumbnails
            .medium
            .as_ref()
            .or(self.snippet.thumbnails.default.as_ref())
            .map_or("", |t| t.url.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: u32,
    pub results_per_page: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSearchResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl VideoSearchResponse {
    /// "Nothing found" after an exhausted fallback chain: a valid,
    /// explicitly empty result set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Duration filter forwarded to the upstream call; which bucket to use is
/// a property of the call site (trailers vs. reviews), not of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoDuration {
    Short,
    Medium,
    Long,
}

impl VideoDuration {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

/// Video quality filter, likewise owned by the call site. Trailer lookups
/// ask for high definition; review lookups take anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoDefinition {
    High,
    Standard,
}

impl VideoDefinition {
    const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Standard => "standard",
        }
    }
}

#[derive(Clone)]
pub struct YoutubeClient {
    client: Client,
    config: YoutubeConfig,
}

impl YoutubeClient {
    #[must_use]
    pub const fn new(client: Client, config: YoutubeConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={video_id}")
    }

    #[must_use]
    pub fn embed_url(video_id: &str) -> String {
        format!("https://www.youtube.com/embed/{video_id}?autoplay=0&rel=0&modestbranding=1")
    }
}

#[async_trait]
impl VideoSearch for YoutubeClient {
    async fn search_videos(
        &self,
        query: &str,
        max_results: u8,
        duration: Option<VideoDuration>,
        definition: Option<VideoDefinition>,
    ) -> Result<VideoSearchResponse, ClientError> {
        let mut url = format!(
            "{}/search?part=snippet&q={}&type=video&maxResults={}&order=relevance&key={}",
            self.config.base_url,
            urlencoding::encode(query),
            max_results,
            self.config.api_key
        );
        if let Some(duration) = duration {
            url.push_str("&videoDuration=");
            url.push_str(duration.as_str());
        }
        if let Some(definition) = definition {
            url.push_str("&videoDefinition=");
            url.push_str(definition.as_str());
        }

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
}
