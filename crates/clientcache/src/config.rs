use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

use clientcache_core::filter::FilterCriteria;
use clientcache_core::preload::PreloadPolicy;

/// Error returned when an enum-valued setting holds an unknown value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {setting} value: {value}")]
pub struct ParseSettingError {
    setting: &'static str,
    value: String,
}

/// Which cache backend to connect to at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
}

impl FromStr for CacheBackend {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            _ => Err(ParseSettingError {
                setting: "CACHE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// How filtered reads use the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    /// One cache entry per distinct filter.
    PerFilter,
    /// One cache entry for the unfiltered dataset, filtered in process.
    FullDataset,
}

impl FromStr for CacheStrategy {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-filter" => Ok(Self::PerFilter),
            "full-dataset" => Ok(Self::FullDataset),
            _ => Err(ParseSettingError {
                setting: "CACHE_STRATEGY",
                value: s.to_string(),
            }),
        }
    }
}

/// Which record store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    InMemory,
}

impl FromStr for StorageBackend {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "inmemory" | "in-memory" => Ok(Self::InMemory),
            _ => Err(ParseSettingError {
                setting: "STORAGE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// Redis connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisSettings {
    /// Full connection URL. Takes precedence over host, port and TLS.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    /// `host:port` seed nodes. A non-empty list selects cluster mode.
    pub cluster_nodes: Vec<String>,
    pub tls: bool,
    /// Number of multiplexed connections in the single-node pool.
    pub pool_size: usize,
    pub command_timeout: Duration,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 6379,
            cluster_nodes: Vec::new(),
            tls: false,
            pool_size: 4,
            command_timeout: Duration::from_millis(10_000),
        }
    }
}

impl RedisSettings {
    /// Returns the connection URLs to use: the cluster seed nodes in cluster
    /// mode, otherwise a single node URL.
    pub fn connection_urls(&self) -> Vec<String> {
        let scheme = if self.tls { "rediss" } else { "redis" };

        if !self.cluster_nodes.is_empty() {
            return self
                .cluster_nodes
                .iter()
                .map(|node| format!("{}://{}", scheme, node))
                .collect();
        }

        match &self.url {
            Some(url) => vec![url.clone()],
            None => vec![format!("{}://{}:{}", scheme, self.host, self.port)],
        }
    }

    pub fn is_cluster(&self) -> bool {
        !self.cluster_nodes.is_empty()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub cache_backend: CacheBackend,
    pub cache_strategy: CacheStrategy,
    /// TTL for per-filter entries in seconds (default: 1800)
    pub cache_ttl_seconds: u64,
    /// TTL for the complete dataset entry in seconds (default: 43200)
    pub full_dataset_ttl_seconds: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Seconds between cache statistics log lines, 0 disables (default: 300)
    pub cache_stats_interval_seconds: u64,
    pub storage_backend: StorageBackend,
    /// Path to SQLite database file (default: "clientcache.db")
    pub sqlite_path: String,
    /// Seed demo rows into an empty store at startup.
    pub seed_demo_data: bool,
    pub redis: RedisSettings,
    pub preload: PreloadPolicy,
    /// Filters warmed by the scenario preload job.
    pub preload_scenarios: Vec<FilterCriteria>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `CACHE_STRATEGY` - `per-filter` or `full-dataset` (default: per-filter)
    /// - `CACHE_TTL_SECONDS` - Per-filter TTL in seconds (default: 1800)
    /// - `FULL_DATASET_TTL_SECONDS` - Complete dataset TTL in seconds (default: 43200)
    /// - `CACHE_MAX_ENTRIES` - Maximum in-memory cache entries (default: 10,000)
    /// - `CACHE_STATS_INTERVAL_SECONDS` - Statistics log period, 0 disables (default: 300)
    /// - `STORAGE_BACKEND` - `sqlite` or `inmemory` (default: sqlite)
    /// - `SQLITE_PATH` - SQLite database path (default: "clientcache.db")
    /// - `SEED_DEMO_DATA` - Seed demo rows when the store is empty (default: false)
    /// - `REDIS_URL`, `REDIS_HOST`, `REDIS_PORT`, `REDIS_CLUSTER_NODES`, `REDIS_TLS`,
    ///   `REDIS_POOL_SIZE`, `REDIS_COMMAND_TIMEOUT_MS`
    /// - `PRELOAD_ENABLED`, `PRELOAD_TIMEOUT_MULTIPLIER`, `PRELOAD_MIN_TIMEOUT_MS`,
    ///   `PRELOAD_INTER_JOB_DELAY_MS`, `PRELOAD_EXCLUDE`, `PRELOAD_INCLUDE_ONLY`,
    ///   `PRELOAD_SCENARIOS` (JSON array of filters, default: `[{}]`)
    pub fn from_env() -> Self {
        let redis_defaults = RedisSettings::default();
        let preload_defaults = PreloadPolicy::default();

        Self {
            cache_backend: parse_setting("CACHE_BACKEND", CacheBackend::Memory),
            cache_strategy: parse_setting("CACHE_STRATEGY", CacheStrategy::PerFilter),
            cache_ttl_seconds: parse_or("CACHE_TTL_SECONDS", 1_800),
            full_dataset_ttl_seconds: parse_or("FULL_DATASET_TTL_SECONDS", 43_200),
            cache_max_entries: parse_or("CACHE_MAX_ENTRIES", 10_000),
            cache_stats_interval_seconds: parse_or("CACHE_STATS_INTERVAL_SECONDS", 300),
            storage_backend: parse_setting("STORAGE_BACKEND", StorageBackend::Sqlite),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "clientcache.db".to_string()),
            seed_demo_data: parse_or("SEED_DEMO_DATA", false),
            redis: RedisSettings {
                url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
                host: env::var("REDIS_HOST").unwrap_or(redis_defaults.host),
                port: parse_or("REDIS_PORT", redis_defaults.port),
                cluster_nodes: parse_list("REDIS_CLUSTER_NODES"),
                tls: parse_or("REDIS_TLS", redis_defaults.tls),
                pool_size: parse_or("REDIS_POOL_SIZE", redis_defaults.pool_size),
                command_timeout: Duration::from_millis(parse_or(
                    "REDIS_COMMAND_TIMEOUT_MS",
                    redis_defaults.command_timeout.as_millis() as u64,
                )),
            },
            preload: PreloadPolicy {
                enabled: parse_or("PRELOAD_ENABLED", preload_defaults.enabled),
                timeout_multiplier: parse_or(
                    "PRELOAD_TIMEOUT_MULTIPLIER",
                    preload_defaults.timeout_multiplier,
                ),
                min_timeout: Duration::from_millis(parse_or(
                    "PRELOAD_MIN_TIMEOUT_MS",
                    preload_defaults.min_timeout.as_millis() as u64,
                )),
                inter_job_delay: Duration::from_millis(parse_or(
                    "PRELOAD_INTER_JOB_DELAY_MS",
                    preload_defaults.inter_job_delay.as_millis() as u64,
                )),
                exclude: parse_list("PRELOAD_EXCLUDE"),
                include_only: parse_list("PRELOAD_INCLUDE_ONLY"),
            },
            preload_scenarios: parse_scenarios(env::var("PRELOAD_SCENARIOS").ok().as_deref()),
        }
    }

    /// Get the per-filter cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the complete dataset TTL as a Duration.
    pub fn full_dataset_ttl(&self) -> Duration {
        Duration::from_secs(self.full_dataset_ttl_seconds)
    }

    /// Period of the cache statistics log, or `None` when disabled.
    pub fn cache_stats_interval(&self) -> Option<Duration> {
        (self.cache_stats_interval_seconds > 0)
            .then(|| Duration::from_secs(self.cache_stats_interval_seconds))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_setting<T>(name: &str, default: T) -> T
where
    T: FromStr<Err = ParseSettingError>,
{
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Falling back to default setting");
            default
        }),
        Err(_) => default,
    }
}

/// Parses a comma-separated list, dropping blank items.
fn parse_list(name: &str) -> Vec<String> {
    env::var(name)
        .map(|v| split_list(&v))
        .unwrap_or_default()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses the preload scenarios. Missing or invalid JSON yields a single
/// unfiltered scenario.
fn parse_scenarios(raw: Option<&str>) -> Vec<FilterCriteria> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return vec![FilterCriteria::default()];
    };
    match serde_json::from_str(raw) {
        Ok(scenarios) => scenarios,
        Err(err) => {
            tracing::warn!(error = %err, "Invalid PRELOAD_SCENARIOS, using the unfiltered scenario");
            vec![FilterCriteria::default()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_conversion() {
        let config = Config {
            cache_ttl_seconds: 600,
            full_dataset_ttl_seconds: 7200,
            ..Config::from_env()
        };

        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.full_dataset_ttl(), Duration::from_secs(7200));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        for name in [
            "CACHE_BACKEND",
            "CACHE_STRATEGY",
            "CACHE_TTL_SECONDS",
            "FULL_DATASET_TTL_SECONDS",
            "CACHE_MAX_ENTRIES",
            "CACHE_STATS_INTERVAL_SECONDS",
            "STORAGE_BACKEND",
            "SQLITE_PATH",
            "SEED_DEMO_DATA",
            "REDIS_URL",
            "REDIS_HOST",
            "REDIS_PORT",
            "REDIS_CLUSTER_NODES",
            "REDIS_TLS",
            "REDIS_POOL_SIZE",
            "REDIS_COMMAND_TIMEOUT_MS",
            "PRELOAD_ENABLED",
            "PRELOAD_TIMEOUT_MULTIPLIER",
            "PRELOAD_MIN_TIMEOUT_MS",
            "PRELOAD_INTER_JOB_DELAY_MS",
            "PRELOAD_EXCLUDE",
            "PRELOAD_INCLUDE_ONLY",
            "PRELOAD_SCENARIOS",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();

        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.cache_strategy, CacheStrategy::PerFilter);
        assert_eq!(config.cache_ttl_seconds, 1_800);
        assert_eq!(config.full_dataset_ttl_seconds, 43_200);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_stats_interval(), Some(Duration::from_secs(300)));
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert_eq!(config.sqlite_path, "clientcache.db");
        assert!(!config.seed_demo_data);
        assert_eq!(config.redis, RedisSettings::default());
        assert_eq!(config.preload, PreloadPolicy::default());
        assert_eq!(config.preload_scenarios, vec![FilterCriteria::default()]);
    }

    #[test]
    fn test_zero_stats_interval_disables_logging() {
        let config = Config {
            cache_stats_interval_seconds: 0,
            ..Config::from_env()
        };
        assert_eq!(config.cache_stats_interval(), None);
    }

    #[test]
    fn test_enum_settings_parse() {
        assert_eq!("Redis".parse::<CacheBackend>(), Ok(CacheBackend::Redis));
        assert_eq!(
            "full-dataset".parse::<CacheStrategy>(),
            Ok(CacheStrategy::FullDataset)
        );
        assert_eq!(
            "in-memory".parse::<StorageBackend>(),
            Ok(StorageBackend::InMemory)
        );
        assert!("memcached".parse::<CacheBackend>().is_err());
    }

    #[test]
    fn test_parse_setting_error_display() {
        let err = "postgres".parse::<StorageBackend>().unwrap_err();
        assert_eq!(err.to_string(), "unknown STORAGE_BACKEND value: postgres");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" a, ,b ,c,"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_scenarios() {
        let scenarios = parse_scenarios(Some(r#"[{}, {"region": ["EMEA"]}]"#));
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[1].region, vec!["EMEA".to_string()]);

        assert_eq!(parse_scenarios(None), vec![FilterCriteria::default()]);
        assert_eq!(
            parse_scenarios(Some("not json")),
            vec![FilterCriteria::default()]
        );
        assert!(parse_scenarios(Some("[]")).is_empty());
    }

    #[test]
    fn test_single_node_url() {
        let settings = RedisSettings::default();
        assert_eq!(settings.connection_urls(), vec!["redis://localhost:6379"]);
        assert!(!settings.is_cluster());

        let tls = RedisSettings {
            tls: true,
            host: "cache.internal".to_string(),
            port: 6380,
            ..RedisSettings::default()
        };
        assert_eq!(tls.connection_urls(), vec!["rediss://cache.internal:6380"]);
    }

    #[test]
    fn test_explicit_url_wins_over_host() {
        let settings = RedisSettings {
            url: Some("redis://:secret@10.0.0.5:6379/2".to_string()),
            host: "ignored".to_string(),
            ..RedisSettings::default()
        };
        assert_eq!(
            settings.connection_urls(),
            vec!["redis://:secret@10.0.0.5:6379/2"]
        );
    }

    #[test]
    fn test_cluster_urls() {
        let settings = RedisSettings {
            cluster_nodes: vec!["n1:7000".to_string(), "n2:7001".to_string()],
            tls: true,
            ..RedisSettings::default()
        };
        assert!(settings.is_cluster());
        assert_eq!(
            settings.connection_urls(),
            vec!["rediss://n1:7000", "rediss://n2:7001"]
        );
    }
}
