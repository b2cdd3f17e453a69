use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::clients::tmdb::MoviePage;
use crate::clients::{ClientError, MovieSearch};
use crate::config::CacheConfig;
use crate::db::Store;
use crate::query::normalize;

/// Only upstream failures surface to callers; cache trouble on either the
/// read or the write path degrades to fetching, never to an error.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("movie search upstream failed: {0}")]
    Upstream(#[source] Arc<ClientError>),
}

type Outcome = Result<MoviePage, Arc<ClientError>>;
type InFlightMap = Mutex<HashMap<String, broadcast::Sender<Outcome>>>;

/// Cache-through movie search.
///
/// Lookups are keyed by the normalized query text. A hit skips the
/// upstream entirely; a miss fetches once and persists the payload
/// best-effort. Concurrent misses on the same key are collapsed into a
/// single upstream call: the first caller becomes the leader, everyone
/// else subscribes to its outcome.
pub struct SearchService {
    store: Store,
    client: Arc<dyn MovieSearch>,
    max_age: Option<chrono::Duration>,
    in_flight: InFlightMap,
}

impl SearchService {
    #[must_use]
    pub fn new(store: Store, client: Arc<dyn MovieSearch>, cache: &CacheConfig) -> Self {
        let max_age = if cache.max_age_hours == 0 {
            None
        } else {
            Some(chrono::Duration::hours(i64::from(cache.max_age_hours)))
        };

        Self {
            store,
            client,
            max_age,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub async fn search(&self, raw_query: &str) -> Result<MoviePage, SearchError> {
        let key = normalize(raw_query);
        if key.is_empty() {
            return Ok(MoviePage::empty());
        }

        match self.store.get_cached_search(&key, self.max_age).await {
            Ok(Some(page)) => {
                debug!("cache hit for '{}'", key);
                return Ok(page);
            }
            Ok(None) => {}
            // A broken cache must not fail the lookup; fall through to
            // the upstream as if it were a miss.
            Err(e) => warn!("cache read failed for '{}', treating as miss: {:#}", key, e),
        }

        let rx = {
            let Ok(mut in_flight) = self.in_flight.lock() else {
                return self.fetch_and_store(&key).await.map_err(SearchError::Upstream);
            };
            match in_flight.get(&key) {
                Some(tx) => Some(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    in_flight.insert(key.clone(), tx);
                    None
                }
            }
        };

        if let Some(mut rx) = rx {
            debug!("joining in-flight fetch for '{}'", key);
            return match rx.recv().await {
                Ok(outcome) => outcome.map_err(SearchError::Upstream),
                // Leader was cancelled before it could broadcast; fetch
                // for ourselves rather than failing the caller.
                Err(_) => self.fetch_and_store(&key).await.map_err(SearchError::Upstream),
            };
        }

        let guard = InFlightGuard {
            map: &self.in_flight,
            key: &key,
        };
        let outcome = self.fetch_and_store(&key).await;
        guard.finish(&outcome);
        outcome.map_err(SearchError::Upstream)
    }

    /// One upstream call plus a best-effort cache write. A rejected write
    /// is logged and the freshly fetched payload is still returned; a
    /// failed fetch is surfaced without writing a negative entry.
    async fn fetch_and_store(&self, key: &str) -> Outcome {
        info!("cache miss for '{}', querying upstream", key);

        let page = self
            .client
            .search_movies(key, 1)
            .await
            .map_err(Arc::new)?;

        if let Err(e) = self.store.cache_search_results(key, &page).await {
            warn!("failed to persist search results for '{}': {:#}", key, e);
        }

        Ok(page)
    }
}

/// Removes the in-flight entry for a key once its fetch settles, and on
/// the happy path fans the outcome out to any waiting followers. Dropping
/// without `finish` (leader cancelled) still clears the entry so later
/// callers do not wait on a sender that will never fire.
struct InFlightGuard<'a> {
    map: &'a InFlightMap,
    key: &'a str,
}

impl InFlightGuard<'_> {
    fn finish(self, outcome: &Outcome) {
        if let Ok(mut map) = self.map.lock()
            && let Some(tx) = map.remove(self.key)
        {
            let _ = tx.send(outcome.clone());
        }
        std::mem::forget(self);
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut map) = self.map.lock() {
            map.remove(self.key);
        }
    }
}
