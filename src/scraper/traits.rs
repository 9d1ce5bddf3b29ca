use crate::model::{RawListing, SourceError};

#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_listings(&self) -> Result<Vec<RawListing>, SourceError>;
}
