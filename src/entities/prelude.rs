pub use super::movie_reviews::Entity as MovieReviews;
pub use super::search_cache::Entity as SearchCache;
