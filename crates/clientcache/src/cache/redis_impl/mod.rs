//! Redis cache backend implementation.
//!
//! Connects to a single node through a small round-robin set of multiplexed
//! connection managers, or to a cluster through a cluster connection. Every
//! command is bounded by the configured command timeout.

mod cache;
mod error;

pub use cache::RedisCache;
