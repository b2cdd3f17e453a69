pub mod tmdb;
pub mod youtube;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure classification for upstream HTTP calls.
///
/// Clients always propagate these; coercing a failure into an
/// empty-shaped success happens only at call sites that can justify it
/// (the per-attempt boundary of the video fallback chain).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error reaching {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },
}

impl ClientError {
    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::Transport { service, .. } | Self::Status { service, .. } => service,
        }
    }
}

/// Movie search seam used by the cache-through lookup.
#[async_trait]
pub trait MovieSearch: Send + Sync {
    async fn search_movies(&self, query: &str, page: u32)
    -> Result<tmdb::MoviePage, ClientError>;
}

/// Video search seam used by the multi-query fallback resolver.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(
        &self,
        query: &str,
        max_results: u8,
        duration: Option<youtube::VideoDuration>,
        definition: Option<youtube::VideoDefinition>,
    ) -> Result<youtube::VideoSearchResponse, ClientError>;
}
