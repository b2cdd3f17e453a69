use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::clients::tmdb::MoviePage;
use crate::entities::{prelude::*, search_cache};

pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Point lookup by normalized query. Absent is not an error; a
    /// malformed row surfaces as `Err` and the lookup layer treats it as
    /// a miss. When a max age is configured, entries older than it stop
    /// counting as hits and are cleaned up opportunistically.
    pub async fn get_cached_search(
        &self,
        query: &str,
        max_age: Option<chrono::Duration>,
    ) -> Result<Option<MoviePage>> {
        let mut finder = SearchCache::find().filter(search_cache::Column::Query.eq(query));

        if let Some(max_age) = max_age {
            let cutoff = (chrono::Utc::now() - max_age).to_rfc3339();

            // Opportunistic cleanup of expired entries. Ideally this would
            // be a background job, but this is simple.
            let _ = SearchCache::delete_many()
                .filter(search_cache::Column::CreatedAt.lt(&cutoff))
                .exec(&self.conn)
                .await;

            finder = finder.filter(search_cache::Column::CreatedAt.gt(cutoff));
        }

        let entry = finder.one(&self.conn).await?;

        if let Some(e) = entry {
            let page: MoviePage = serde_json::from_str(&e.results_json)?;
            Ok(Some(page))
        } else {
            Ok(None)
        }
    }

    /// Inserts a new entry under the normalized query. Entries are
    /// immutable once written: a conflicting key means someone else got
    /// there first, which is not a failure.
    pub async fn cache_search_results(&self, query: &str, page: &MoviePage) -> Result<()> {
        let results_json = serde_json::to_string(page)?;
        let created_at = chrono::Utc::now().to_rfc3339();

        let active_model = search_cache::ActiveModel {
            query: Set(query.to_string()),
            results_json: Set(results_json),
            created_at: Set(created_at),
            ..Default::default()
        };

        let insert = SearchCache::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(search_cache::Column::Query)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
