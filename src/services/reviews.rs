use thiserror::Error;

use crate::db::{Review, Store};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("review {0} not found")]
    NotFound(i32),

    #[error("database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// User-submitted movie reviews: validated writes, recency-ordered reads
/// and a helpfulness counter.
pub struct ReviewService {
    store: Store,
}

impl ReviewService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_for_movie(&self, movie_id: i64) -> Result<Vec<Review>, ReviewError> {
        Ok(self.store.list_reviews(movie_id).await?)
    }

    pub async fn submit(
        &self,
        movie_id: i64,
        user_name: &str,
        rating: i32,
        review_text: &str,
    ) -> Result<Review, ReviewError> {
        let user_name = user_name.trim();
        let review_text = review_text.trim();

        if user_name.is_empty() {
            return Err(ReviewError::EmptyField("user name"));
        }
        if review_text.is_empty() {
            return Err(ReviewError::EmptyField("review text"));
        }
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::InvalidRating(rating));
        }

        Ok(self
            .store
            .add_review(movie_id, user_name, rating, review_text)
            .await?)
    }

    pub async fn mark_helpful(&self, review_id: i32) -> Result<(), ReviewError> {
        if self.store.mark_review_helpful(review_id).await? {
            Ok(())
        } else {
            Err(ReviewError::NotFound(review_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_service() -> ReviewService {
        let db_path =
            std::env::temp_dir().join(format!("caritahu-review-test-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .expect("failed to open temp store");
        ReviewService::new(store)
    }

    #[tokio::test]
    async fn test_submit_and_list_newest_first() {
        let svc = temp_service().await;

        svc.submit(603, "andi", 5, "Keren banget").await.unwrap();
        svc.submit(603, "budi", 3, "Lumayan").await.unwrap();
        svc.submit(604, "citra", 4, "Sekuel yang bagus").await.unwrap();

        let reviews = svc.list_for_movie(603).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].user_name, "budi");
        assert_eq!(reviews[1].user_name, "andi");
    }

    #[tokio::test]
    async fn test_submit_validates_rating_range() {
        let svc = temp_service().await;

        assert!(matches!(
            svc.submit(603, "andi", 0, "text").await,
            Err(ReviewError::InvalidRating(0))
        ));
        assert!(matches!(
            svc.submit(603, "andi", 6, "text").await,
            Err(ReviewError::InvalidRating(6))
        ));
        assert!(svc.submit(603, "andi", 1, "text").await.is_ok());
        assert!(svc.submit(603, "andi", 5, "text").await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_fields() {
        let svc = temp_service().await;

        assert!(matches!(
            svc.submit(603, "   ", 4, "text").await,
            Err(ReviewError::EmptyField("user name"))
        ));
        assert!(matches!(
            svc.submit(603, "andi", 4, "  ").await,
            Err(ReviewError::EmptyField("review text"))
        ));
    }

    #[tokio::test]
    async fn test_mark_helpful_increments_counter() {
        let svc = temp_service().await;

        let review = svc.submit(603, "andi", 5, "Bagus").await.unwrap();
        assert_eq!(review.helpful_count, 0);

        svc.mark_helpful(review.id).await.unwrap();
        svc.mark_helpful(review.id).await.unwrap();

        let reviews = svc.list_for_movie(603).await.unwrap();
        assert_eq!(reviews[0].helpful_count, 2);
    }

    #[tokio::test]
    async fn test_mark_helpful_unknown_review() {
        let svc = temp_service().await;
        assert!(matches!(
            svc.mark_helpful(9999).await,
            Err(ReviewError::NotFound(9999))
        ));
    }
}
