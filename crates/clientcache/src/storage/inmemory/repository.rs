//! In-memory repository implementation.

use std::sync::Arc;

use async_trait::async_trait;

use clientcache_core::filter::{filter_records, FilterCriteria};
use clientcache_core::record::FlatRecord;
use clientcache_core::storage::{RecordRepository, Result};

/// In-memory storage backend over a fixed record set.
///
/// Data is not persisted and will be lost when the repository is dropped.
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Vec<FlatRecord>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `records`.
    pub fn with_records(records: Vec<FlatRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub async fn count_records(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn fetch_records(&self, criteria: &FilterCriteria) -> Result<Vec<FlatRecord>> {
        Ok(filter_records(&self.records, criteria))
    }
}
