//! In-memory cache backend implementation.
//!
//! Used when Redis is not configured, and as the startup fallback when Redis
//! cannot be reached.

mod cache;

pub use cache::MemoryCache;
