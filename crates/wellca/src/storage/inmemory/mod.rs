//! In-memory storage backend.
//!
//! Stores records in a `HashMap` wrapped in `Arc<RwLock<_>>`. Used by the
//! CLI and throughout the tests; nothing is persisted.

mod repository;

pub use repository::InMemoryRepository;
