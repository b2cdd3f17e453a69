pub mod reviews;
pub mod search;
pub mod videos;

pub use reviews::{ReviewError, ReviewService};
pub use search::{SearchError, SearchService};
pub use videos::VideoLookupService;
