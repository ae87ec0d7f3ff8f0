//! Shared test doubles.

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

use clientcache_core::cache::{Cache, CacheError, Result as CacheResult};
use clientcache_core::filter::{filter_records, FilterCriteria};
use clientcache_core::record::FlatRecord;
use clientcache_core::storage::{RecordRepository, RepositoryError, Result};

/// Cache that records calls and can be switched into failure modes.
#[derive(Default)]
pub struct MockCache {
    store: RwLock<HashMap<String, (Vec<u8>, Option<Duration>)>>,
    pub get_calls: AtomicUsize,
    pub set_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose every operation fails, as if Redis were down.
    pub fn unavailable() -> Self {
        let cache = Self::default();
        cache.fail_reads.store(true, Ordering::SeqCst);
        cache.fail_writes.store(true, Ordering::SeqCst);
        cache
    }

    /// A cache that reads fine but rejects writes.
    pub fn read_only() -> Self {
        let cache = Self::default();
        cache.fail_writes.store(true, Ordering::SeqCst);
        cache
    }

    pub async fn insert_raw(&self, key: &str, value: &[u8]) {
        self.store
            .write()
            .await
            .insert(key.to_string(), (value.to_vec(), None));
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }

    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.store.read().await.get(key).and_then(|(_, ttl)| *ttl)
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(self.store.read().await.get(key).map(|(v, _)| v.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout(10_000));
        }
        self.store
            .write()
            .await
            .insert(key.to_string(), (value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("connection refused".to_string()));
        }
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Repository over a fixed record set that counts every fetch and keeps the
/// criteria it was asked for.
#[derive(Default)]
pub struct CountingRepository {
    records: Vec<FlatRecord>,
    pub fetch_calls: AtomicUsize,
    criteria: Mutex<Vec<FilterCriteria>>,
    fail: bool,
}

impl CountingRepository {
    pub fn new(records: Vec<FlatRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// A repository whose every query fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn seen_criteria(&self) -> Vec<FilterCriteria> {
        self.criteria.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordRepository for CountingRepository {
    async fn fetch_records(&self, criteria: &FilterCriteria) -> Result<Vec<FlatRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.criteria.lock().unwrap().push(criteria.clone());
        if self.fail {
            return Err(RepositoryError::ConnectionFailed(
                "database unreachable".to_string(),
            ));
        }
        Ok(filter_records(&self.records, criteria))
    }
}

/// Small record set spanning two parents, three clients and four customers.
pub fn sample_records() -> Vec<FlatRecord> {
    vec![
        FlatRecord::new("100", "C-1", "K-1")
            .with_names("Northwind Holdings", "Northwind Asset Mgmt", "Northwind Fund I")
            .with_segment("Asset Manager")
            .with_region("AMRS")
            .with_country("US"),
        FlatRecord::new("100", "C-1", "K-2")
            .with_names("Northwind Holdings", "Northwind Asset Mgmt", "Northwind Fund II")
            .with_segment("Asset Manager")
            .with_region("AMRS")
            .with_country("CA"),
        FlatRecord::new("100", "C-4", "K-5")
            .with_names("Northwind Holdings", "Northwind Insurance", "Northwind Life")
            .with_segment("Insurance")
            .with_region("AMRS")
            .with_country("US"),
        FlatRecord::new("200", "C-2", "K-3")
            .with_names("Contoso Group", "Contoso Pensions", "Contoso DB Plan")
            .with_segment("Asset Owner")
            .with_region("EMEA")
            .with_country("GB"),
    ]
}

/// Collects formatted log lines. Install with `tracing::subscriber::set_default`.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).to_string()
    }

    pub fn subscriber(&self) -> impl tracing::Subscriber {
        tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(self.clone())
                .with_ansi(false),
        )
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

pub struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
