//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `RecordRepository`
//! trait defined in `clientcache_core::storage`, plus the cached decorators
//! that sit in front of them.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always available. `STORAGE_BACKEND` selects the
//! backend at startup.

use std::sync::Arc;

use clientcache_core::storage::{RecordRepository, Result};

use crate::config::{Config, StorageBackend};
use crate::mock_data::generate_demo_records;

pub mod cached;
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

/// Opens the configured storage backend.
///
/// When `SEED_DEMO_DATA` is set and the store is empty, demo records are
/// inserted before the repository is returned.
pub async fn connect(config: &Config) -> Result<Arc<dyn RecordRepository>> {
    match config.storage_backend {
        StorageBackend::InMemory => {
            let repo = if config.seed_demo_data {
                InMemoryRepository::with_records(generate_demo_records())
            } else {
                InMemoryRepository::new()
            };
            tracing::info!(
                records = repo.count_records().await?,
                "Using in-memory storage"
            );
            Ok(Arc::new(repo))
        }
        StorageBackend::Sqlite => connect_sqlite(config).await,
    }
}

#[cfg(feature = "sqlite")]
async fn connect_sqlite(config: &Config) -> Result<Arc<dyn RecordRepository>> {
    let repo = SqliteRepository::new(&config.sqlite_path).await?;

    if config.seed_demo_data && repo.count_records().await? == 0 {
        let inserted = repo.insert_records(&generate_demo_records()).await?;
        tracing::info!(inserted, "Seeded SQLite store with demo data");
    }

    tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "sqlite"))]
async fn connect_sqlite(_config: &Config) -> Result<Arc<dyn RecordRepository>> {
    Err(clientcache_core::storage::RepositoryError::ConnectionFailed(
        "built without the `sqlite` feature; set STORAGE_BACKEND=inmemory".to_string(),
    ))
}
