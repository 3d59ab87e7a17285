//! In-memory sync gateway
//!
//! Backs demo mode and the test suite. Mirrors the backend contract:
//! writes replace whole sets and are rejected when the PIN does not match,
//! and the whole gateway can be switched into an unreachable state to
//! exercise the local-first fallback.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::{PerformanceRecord, UnpaidInvoice, WeeklySnapshot};
use crate::ports::SyncGateway;

#[derive(Debug, Default)]
struct Stored {
    performance: Vec<PerformanceRecord>,
    unpaid: Vec<UnpaidInvoice>,
    weekly: Option<WeeklySnapshot>,
}

#[derive(Debug, Default)]
pub struct MemorySyncGateway {
    expected_pin: Option<String>,
    pin: String,
    stored: Mutex<Stored>,
    unreachable: AtomicBool,
    writes: AtomicUsize,
}

impl MemorySyncGateway {
    /// Gateway that accepts any PIN
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway that only accepts `pin`, sent as `client_pin`
    pub fn with_pin(pin: &str, client_pin: &str) -> Self {
        Self {
            expected_pin: Some(pin.to_string()),
            pin: client_pin.to_string(),
            ..Default::default()
        }
    }

    /// Make every call fail as if the backend were down
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of successful writes across all three sets
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn stored_performance(&self) -> Vec<PerformanceRecord> {
        self.stored.lock().await.performance.clone()
    }

    pub async fn stored_unpaid(&self) -> Vec<UnpaidInvoice> {
        self.stored.lock().await.unpaid.clone()
    }

    pub async fn stored_weekly(&self) -> Option<WeeklySnapshot> {
        self.stored.lock().await.weekly.clone()
    }

    fn check(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::upstream("backend unreachable"));
        }
        if let Some(expected) = &self.expected_pin {
            if &self.pin != expected {
                return Err(Error::authorization("backend rejected the PIN"));
            }
        }
        Ok(())
    }

    fn check_read(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::upstream("backend unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SyncGateway for MemorySyncGateway {
    async fn put_performance_rows(&self, rows: &[PerformanceRecord]) -> Result<()> {
        self.check()?;
        self.stored.lock().await.performance = rows.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn put_unpaid_invoices(&self, invoices: &[UnpaidInvoice]) -> Result<()> {
        self.check()?;
        self.stored.lock().await.unpaid = invoices.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn put_weekly_snapshot(&self, snapshot: &WeeklySnapshot) -> Result<()> {
        self.check()?;
        self.stored.lock().await.weekly = Some(snapshot.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_performance_rows(&self) -> Result<Vec<PerformanceRecord>> {
        self.check_read()?;
        Ok(self.stored.lock().await.performance.clone())
    }

    async fn fetch_unpaid_invoices(&self) -> Result<Vec<UnpaidInvoice>> {
        self.check_read()?;
        Ok(self.stored.lock().await.unpaid.clone())
    }

    async fn fetch_weekly_snapshot(&self) -> Result<Option<WeeklySnapshot>> {
        self.check_read()?;
        Ok(self.stored.lock().await.weekly.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PerformanceRecord {
        PerformanceRecord {
            month: "2025-06".into(),
            cat1: "B2B".into(),
            cat2: "일반".into(),
            cat3: "통합".into(),
            count: 1,
            rev: 100.0,
            purchase: 0.0,
            labor: 0.0,
            sga: 0.0,
        }
    }

    #[tokio::test]
    async fn test_write_replaces_and_counts() {
        let gateway = MemorySyncGateway::new();
        gateway.put_performance_rows(&[record()]).await.unwrap();
        gateway.put_performance_rows(&[]).await.unwrap();
        assert_eq!(gateway.write_count(), 2);
        assert!(gateway.fetch_performance_rows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_pin_is_rejected() {
        let gateway = MemorySyncGateway::with_pin("1234", "9999");
        let err = gateway.put_performance_rows(&[record()]).await.unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
        assert_eq!(gateway.write_count(), 0);
        // reads need no PIN
        assert!(gateway.fetch_performance_rows().await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_flag() {
        let gateway = MemorySyncGateway::new();
        gateway.set_unreachable(true);
        let err = gateway.put_performance_rows(&[record()]).await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(gateway.fetch_performance_rows().await.is_err());
        gateway.set_unreachable(false);
        assert!(gateway.put_performance_rows(&[record()]).await.is_ok());
    }
}
