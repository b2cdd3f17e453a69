use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::VideoSearch;
use crate::clients::youtube::{VideoDefinition, VideoDuration, VideoSearchResponse};
use crate::query::build_variants;

/// Query phrasings tried in order when looking for a trailer. The
/// upstream search is noisy and title-dependent; several phrasings
/// materially improve the hit rate.
const TRAILER_QUERIES: &[&str] = &[
    "{title} official trailer {year}",
    "{title} trailer {year}",
    "{title} movie trailer",
];

const REVIEW_QUERIES: &[&str] = &[
    "{title} review {year}",
    "{title} movie review",
    "{title} film review",
    "review {title}",
];

const TRAILER_RESULT_CAP: u8 = 3;
const REVIEW_RESULT_CAP: u8 = 6;

/// Ordered-fallback video lookup.
///
/// Each variant gets one capped upstream call; the first non-empty result
/// set wins. A failed attempt is logged and the next variant is tried, so
/// one rate-limited query cannot hide a later one that would have
/// succeeded. Exhausting every variant yields an explicitly empty result,
/// which is a normal outcome, not an error.
pub struct VideoLookupService {
    client: Arc<dyn VideoSearch>,
}

impl VideoLookupService {
    #[must_use]
    pub fn new(client: Arc<dyn VideoSearch>) -> Self {
        Self { client }
    }

    pub async fn find_trailers(&self, title: &str, year: Option<&str>) -> VideoSearchResponse {
        self.resolve(
            TRAILER_QUERIES,
            title,
            year,
            TRAILER_RESULT_CAP,
            Some(VideoDuration::Short),
            Some(VideoDefinition::High),
        )
        .await
    }

    pub async fn find_reviews(&self, title: &str, year: Option<&str>) -> VideoSearchResponse {
        self.resolve(
            REVIEW_QUERIES,
            title,
            year,
            REVIEW_RESULT_CAP,
            Some(VideoDuration::Medium),
            None,
        )
        .await
    }

    pub async fn resolve(
        &self,
        templates: &[&str],
        title: &str,
        year: Option<&str>,
        per_query_limit: u8,
        duration: Option<VideoDuration>,
        definition: Option<VideoDefinition>,
    ) -> VideoSearchResponse {
        for query in build_variants(templates, title, year) {
            if query.is_empty() {
                continue;
            }

            match self
                .client
                .search_videos(&query, per_query_limit, duration, definition)
                .await
            {
                Ok(response) if !response.items.is_empty() => {
                    debug!("video query '{}' matched {} item(s)", query, response.items.len());
                    return response;
                }
                Ok(_) => {
                    debug!("video query '{}' returned nothing, trying next variant", query);
                }
                // Per-attempt isolation: a transient failure on one
                // variant must not abort the whole resolution.
                Err(e) => {
                    warn!("video query '{}' failed, trying next variant: {}", query, e);
                }
            }
        }

        VideoSearchResponse::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ClientError;
    use crate::clients::youtube::{VideoId, VideoItem, VideoSnippet};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn item(video_id: &str) -> VideoItem {
        VideoItem {
            id: VideoId {
                video_id: video_id.to_string(),
            },
            snippet: VideoSnippet {
                title: format!("video {video_id}"),
                description: String::new(),
                channel_title: String::new(),
                published_at: String::new(),
                thumbnails: Default::default(),
            },
        }
    }

    fn response_with(ids: &[&str]) -> VideoSearchResponse {
        VideoSearchResponse {
            items: ids.iter().map(|id| item(id)).collect(),
            page_info: Default::default(),
        }
    }

    enum Step {
        Empty,
        Items(Vec<&'static str>),
        Fail,
    }

    /// Replays a script of per-attempt outcomes and records every query
    /// it was asked, in order, along with the filters each one carried.
    struct ScriptedClient {
        script: Mutex<Vec<Step>>,
        seen: Mutex<Vec<String>>,
        seen_filters: Mutex<Vec<(Option<VideoDuration>, Option<VideoDefinition>)>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Step>) -> Self {
            Self {
                script: Mutex::new(script),
                seen: Mutex::new(Vec::new()),
                seen_filters: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }

        fn seen_filters(&self) -> Vec<(Option<VideoDuration>, Option<VideoDefinition>)> {
            self.seen_filters.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VideoSearch for ScriptedClient {
        async fn search_videos(
            &self,
            query: &str,
            max_results: u8,
            duration: Option<VideoDuration>,
            definition: Option<VideoDefinition>,
        ) -> Result<VideoSearchResponse, ClientError> {
            self.seen.lock().unwrap().push(query.to_string());
            self.seen_filters.lock().unwrap().push((duration, definition));

            let step = {
                let mut script = self.script.lock().unwrap();
                if script.is_empty() {
                    Step::Empty
                } else {
                    script.remove(0)
                }
            };

            match step {
                Step::Empty => Ok(VideoSearchResponse::empty()),
                Step::Items(ids) => {
                    let mut response = response_with(&ids);
                    response.items.truncate(max_results as usize);
                    Ok(response)
                }
                Step::Fail => Err(ClientError::Status {
                    service: "YouTube",
                    status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                    body: String::new(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_variants_tried_in_order_until_first_hit() {
        let client = Arc::new(ScriptedClient::new(vec![
            Step::Empty,
            Step::Empty,
            Step::Items(vec!["c1"]),
        ]));
        let svc = VideoLookupService::new(client.clone());

        let result = svc
            .resolve(&["{title} a", "{title} b", "{title} c"], "Dune", None, 3, None, None)
            .await;

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id.video_id, "c1");
        assert_eq!(client.seen(), vec!["Dune a", "Dune b", "Dune c"]);
    }

    #[tokio::test]
    async fn test_short_circuits_on_first_non_empty() {
        let client = Arc::new(ScriptedClient::new(vec![Step::Items(vec!["a1"])]));
        let svc = VideoLookupService::new(client.clone());

        let result = svc
            .resolve(&["{title} a", "{title} b"], "Dune", None, 3, None, None)
            .await;

        assert_eq!(result.items[0].id.video_id, "a1");
        assert_eq!(client.seen().len(), 1, "later variants must not be attempted");
    }

    #[tokio::test]
    async fn test_exhaustion_returns_empty_not_error() {
        let client = Arc::new(ScriptedClient::new(vec![Step::Empty, Step::Empty]));
        let svc = VideoLookupService::new(client.clone());

        let result = svc
            .resolve(&["{title} a", "{title} b"], "Obscure Film", None, 3, None, None)
            .await;

        assert!(result.items.is_empty());
        assert_eq!(client.seen().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_attempt_does_not_abort_resolution() {
        let client = Arc::new(ScriptedClient::new(vec![
            Step::Fail,
            Step::Items(vec!["b1"]),
        ]));
        let svc = VideoLookupService::new(client.clone());

        let result = svc
            .resolve(&["{title} a", "{title} b"], "Dune", None, 3, None, None)
            .await;

        assert_eq!(result.items[0].id.video_id, "b1");
        assert_eq!(client.seen().len(), 2);
    }

    #[tokio::test]
    async fn test_trailer_lookup_builds_expected_variants() {
        let client = Arc::new(ScriptedClient::new(vec![
            Step::Empty,
            Step::Empty,
            Step::Items(vec!["t1", "t2", "t3", "t4"]),
        ]));
        let svc = VideoLookupService::new(client.clone());

        let result = svc.find_trailers("The Matrix", Some("1999")).await;

        assert_eq!(
            client.seen(),
            vec![
                "The Matrix official trailer 1999",
                "The Matrix trailer 1999",
                "The Matrix movie trailer",
            ]
        );
        assert!(result.items.len() <= 3, "trailer results are capped");
    }

    #[tokio::test]
    async fn test_trailer_and_review_lookups_carry_their_filters() {
        let client = Arc::new(ScriptedClient::new(vec![Step::Items(vec!["t1"])]));
        let svc = VideoLookupService::new(client.clone());

        svc.find_trailers("Dune", None).await;
        assert_eq!(
            client.seen_filters()[0],
            (Some(VideoDuration::Short), Some(VideoDefinition::High))
        );

        let client = Arc::new(ScriptedClient::new(vec![Step::Items(vec!["r1"])]));
        let svc = VideoLookupService::new(client.clone());

        svc.find_reviews("Dune", None).await;
        assert_eq!(
            client.seen_filters()[0],
            (Some(VideoDuration::Medium), None)
        );
    }

    #[tokio::test]
    async fn test_review_lookup_sanitizes_title() {
        let client = Arc::new(ScriptedClient::new(vec![Step::Items(vec!["r1"])]));
        let svc = VideoLookupService::new(client.clone());

        svc.find_reviews("Spider-Man: No Way Home", Some("2021")).await;

        assert_eq!(client.seen()[0], "SpiderMan No Way Home review 2021");
    }
}
