//! Service layer - ingestion, classification, aggregation, state and sync

pub mod aggregate;
pub mod classify;
pub mod import;
pub mod store;
pub mod sync;
pub mod weekly;

pub use import::ImportService;
pub use store::{DashboardState, StoreService};
pub use sync::{SyncDebouncer, SyncService};
