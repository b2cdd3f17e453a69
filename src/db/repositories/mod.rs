pub mod cache;
pub mod reviews;
