pub mod fetcher;
pub mod traits;

pub use fetcher::{FileSource, HttpClient, JsonFeedSource};
pub use traits::ListingSource;
