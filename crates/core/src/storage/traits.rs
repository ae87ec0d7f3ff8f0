use async_trait::async_trait;

use crate::filter::FilterCriteria;
use crate::record::FlatRecord;

use super::Result;

/// Read access to product-services records.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Returns the records matching `criteria`. Empty criteria return every record.
    async fn fetch_records(&self, criteria: &FilterCriteria) -> Result<Vec<FlatRecord>>;
}
