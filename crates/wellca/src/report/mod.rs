//! Cached reporting over the record store.

mod invalidation;
mod service;

pub use invalidation::InvalidationCoordinator;
pub use service::ReportService;
