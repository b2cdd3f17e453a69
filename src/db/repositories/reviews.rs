use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use crate::entities::{movie_reviews, prelude::*};

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Reviews for one movie, newest first.
    pub async fn list_for_movie(&self, movie_id: i64) -> Result<Vec<movie_reviews::Model>> {
        let rows = MovieReviews::find()
            .filter(movie_reviews::Column::MovieId.eq(movie_id))
            .order_by_desc(movie_reviews::Column::CreatedAt)
            .order_by_desc(movie_reviews::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn add(
        &self,
        movie_id: i64,
        user_name: &str,
        rating: i32,
        review_text: &str,
    ) -> Result<movie_reviews::Model> {
        let active_model = movie_reviews::ActiveModel {
            movie_id: Set(movie_id),
            user_name: Set(user_name.to_string()),
            rating: Set(rating),
            review_text: Set(review_text.to_string()),
            helpful_count: Set(0),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = MovieReviews::insert(active_model)
            .exec_with_returning(&self.conn)
            .await?;

        Ok(result)
    }

    /// Increments the helpfulness counter. Returns false if the review
    /// does not exist.
    pub async fn mark_helpful(&self, review_id: i32) -> Result<bool> {
        let result = MovieReviews::update_many()
            .col_expr(
                movie_reviews::Column::HelpfulCount,
                Expr::col(movie_reviews::Column::HelpfulCount).add(1),
            )
            .filter(movie_reviews::Column::Id.eq(review_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
