//! Cache backend implementations.
//!
//! Concrete implementations of the `Cache` trait defined in
//! `wellca_core::cache`. Only the in-memory backend exists today.

pub mod memory;

pub use memory::MemoryCache;
