//! In-memory storage backend.
//!
//! Holds a fixed record set behind an `Arc` and filters it with the
//! same matcher the full-dataset cache strategy uses. Useful for tests and
//! demos where persistence is not required.

mod repository;

pub use repository::InMemoryRepository;
