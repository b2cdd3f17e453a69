use std::sync::Arc;

use crate::clients::tmdb::TmdbClient;
use crate::clients::youtube::YoutubeClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{ReviewService, SearchService, VideoLookupService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("CariTahu/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub tmdb: Arc<TmdbClient>,

    pub youtube: Arc<YoutubeClient>,

    pub search_service: Arc<SearchService>,

    pub video_service: Arc<VideoLookupService>,

    pub review_service: Arc<ReviewService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        // One pooled HTTP client for both upstreams.
        let http_client =
            build_shared_http_client(config.general.request_timeout_seconds.into())?;

        let tmdb = Arc::new(TmdbClient::new(http_client.clone(), config.tmdb.clone()));
        let youtube = Arc::new(YoutubeClient::new(http_client, config.youtube.clone()));

        let search_service = Arc::new(SearchService::new(
            store.clone(),
            tmdb.clone(),
            &config.cache,
        ));
        let video_service = Arc::new(VideoLookupService::new(youtube.clone()));
        let review_service = Arc::new(ReviewService::new(store.clone()));

        Ok(Self {
            config,
            store,
            tmdb,
            youtube,
            search_service,
            video_service,
            review_service,
        })
    }
}
