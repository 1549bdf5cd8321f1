//! Storage backend implementations.
//!
//! Concrete implementations of the `RecordRepository` trait defined in
//! `wellca_core::storage`.

pub mod inmemory;

pub use inmemory::InMemoryRepository;
