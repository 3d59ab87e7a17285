//! Sync gateway port - persistence backend abstraction

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{PerformanceRecord, UnpaidInvoice, WeeklySnapshot};

/// Persistence backend abstraction.
///
/// Every put is an idempotent replace-all: callers must hand over the full
/// desired table contents (month-scoped merging happens before the gateway,
/// never inside it). Implementations (adapters) provide the actual transport.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    // === Writes (replace-all) ===

    /// Replace the entire performance table
    async fn put_performance_rows(&self, rows: &[PerformanceRecord]) -> Result<()>;

    /// Replace the entire unpaid-invoice table
    async fn put_unpaid_invoices(&self, invoices: &[UnpaidInvoice]) -> Result<()>;

    /// Replace the single stored weekly snapshot (newest wins, no history)
    async fn put_weekly_snapshot(&self, snapshot: &WeeklySnapshot) -> Result<()>;

    // === Reads (startup hydration) ===

    /// Current contents of the performance table
    async fn fetch_performance_rows(&self) -> Result<Vec<PerformanceRecord>>;

    /// Current contents of the unpaid-invoice table
    async fn fetch_unpaid_invoices(&self) -> Result<Vec<UnpaidInvoice>>;

    /// Latest weekly snapshot, if one has ever been stored
    async fn fetch_weekly_snapshot(&self) -> Result<Option<WeeklySnapshot>>;
}
