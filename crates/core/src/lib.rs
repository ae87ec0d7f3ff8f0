//! Functional core for the clientcache service.
//!
//! Everything in this crate is pure: domain types, cache key derivation,
//! SQL predicate building, in-process filtering, hierarchy grouping and
//! preload planning. I/O lives behind the traits declared here and is
//! implemented by the `clientcache` binary crate.

pub mod cache;
pub mod filter;
pub mod hierarchy;
pub mod preload;
pub mod record;
pub mod serde;
pub mod storage;
