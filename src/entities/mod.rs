pub mod prelude;

pub mod movie_reviews;
pub mod search_cache;
