use async_trait::async_trait;

use crate::domain::listing::ListingSet;
use crate::error::Result;

/// Supplies the read-only listing collections once, at session start.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn load(&self) -> Result<ListingSet>;

    /// Short name used in logs.
    fn source_name(&self) -> &'static str;
}
