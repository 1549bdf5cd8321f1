//! Core types and pure logic for the wellca operations reports.
//!
//! Everything here is free of I/O: the binary crate supplies the cache and
//! store implementations behind the [`cache::Cache`] and
//! [`storage::RecordRepository`] traits.

pub mod cache;
pub mod record;
pub mod report;
pub mod serde;
pub mod storage;
