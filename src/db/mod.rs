use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::clients::tmdb::MoviePage;
use crate::entities::movie_reviews;

pub mod migrator;
pub mod repositories;

pub use crate::entities::movie_reviews::Model as Review;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("mode=memory") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::reviews::ReviewRepository {
        repositories::reviews::ReviewRepository::new(self.conn.clone())
    }

    pub async fn get_cached_search(
        &self,
        query: &str,
        max_age: Option<chrono::Duration>,
    ) -> Result<Option<MoviePage>> {
        self.cache_repo().get_cached_search(query, max_age).await
    }

    pub async fn cache_search_results(&self, query: &str, page: &MoviePage) -> Result<()> {
        self.cache_repo().cache_search_results(query, page).await
    }

    pub async fn list_reviews(&self, movie_id: i64) -> Result<Vec<movie_reviews::Model>> {
        self.review_repo().list_for_movie(movie_id).await
    }

    pub async fn add_review(
        &self,
        movie_id: i64,
        user_name: &str,
        rating: i32,
        review_text: &str,
    ) -> Result<movie_reviews::Model> {
        self.review_repo()
            .add(movie_id, user_name, rating, review_text)
            .await
    }

    pub async fn mark_review_helpful(&self, review_id: i32) -> Result<bool> {
        self.review_repo().mark_helpful(review_id).await
    }
}
