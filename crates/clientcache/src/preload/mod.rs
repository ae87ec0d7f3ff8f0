//! Startup cache preloading.
//!
//! Jobs are collected in a [`PreloadRegistry`], ordered by
//! `clientcache_core::preload::plan_jobs` and run one at a time by
//! [`CachePreloader`] in a background task. Progress is published through a
//! shared [`PreloadStatus`](clientcache_core::preload::PreloadStatus) handle
//! that the status endpoint reads.

mod jobs;
mod registry;
mod runner;

pub use jobs::ScenarioPreloadJob;
pub use registry::PreloadRegistry;
pub use runner::{CachePreloader, SharedPreloadStatus};
