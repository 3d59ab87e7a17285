//! Store service - in-memory dashboard state and the edit operations

use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::{seoul_year_month, PerformanceRecord, UnpaidInvoice, WeeklySnapshot};
use crate::domain::result::{Error, Result};
use crate::services::aggregate;
use crate::services::import::{ImportService, PerformanceBatch, UnpaidBatch};

/// Everything the dashboard shows. One instance per session; the sync
/// layer persists and replicates it as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    #[serde(default)]
    pub performance: Vec<PerformanceRecord>,
    #[serde(default)]
    pub unpaid: Vec<UnpaidInvoice>,
    #[serde(default)]
    pub weekly: Option<WeeklySnapshot>,
}

impl DashboardState {
    pub fn is_empty(&self) -> bool {
        self.performance.is_empty() && self.unpaid.is_empty() && self.weekly.is_none()
    }
}

/// Applies uploads and manual edits to a [`DashboardState`]
#[derive(Debug, Default)]
pub struct StoreService {
    import: ImportService,
}

impl StoreService {
    pub fn new() -> Self {
        Self {
            import: ImportService::new(),
        }
    }

    /// Parse a performance upload and merge it in. The upload replaces
    /// every month it mentions; other months keep their records.
    pub fn apply_performance_upload(
        &self,
        state: &mut DashboardState,
        bytes: &[u8],
    ) -> Result<PerformanceBatch> {
        let batch = self.import.parse_performance(bytes)?;
        let incoming = aggregate::records_from_batch(&batch);
        if incoming.is_empty() {
            return Err(Error::parse(
                "upload contained no records after aggregation",
                batch.rows_read,
                batch.headers,
            ));
        }
        state.performance = aggregate::merge_months(&state.performance, &incoming);
        info!(
            "performance upload merged: {} incoming records, {} total",
            incoming.len(),
            state.performance.len()
        );
        Ok(batch)
    }

    /// Parse an unpaid upload. The eligible rows replace the whole unpaid
    /// set; uploads are full exports, not increments.
    pub fn apply_unpaid_upload(
        &self,
        state: &mut DashboardState,
        bytes: &[u8],
    ) -> Result<UnpaidBatch> {
        let batch = self.import.parse_unpaid(bytes)?;
        state.unpaid = batch.invoices.clone();
        info!("unpaid upload applied: {} invoices", state.unpaid.len());
        Ok(batch)
    }

    /// Parse a weekly upload for the current Seoul week and replace the
    /// snapshot wholesale.
    pub fn apply_weekly_upload(&self, state: &mut DashboardState, bytes: &[u8]) -> Result<WeeklySnapshot> {
        let windows = crate::domain::WeekWindows::current();
        let snapshot = self.import.parse_weekly(bytes, &windows)?;
        info!(
            "weekly upload applied: {} complete, {} scheduled",
            snapshot.complete.len(),
            snapshot.scheduled.len()
        );
        state.weekly = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Append a manually entered record. A blank month defaults to the
    /// current Seoul month; the set is re-aggregated so the new record
    /// folds into an existing group when one exists.
    pub fn add_record(&self, state: &mut DashboardState, mut record: PerformanceRecord) -> Result<()> {
        if record.month.trim().is_empty() {
            record.month = seoul_year_month();
        }
        if record.cat1.trim().is_empty() {
            return Err(Error::validation("cat1 is required"));
        }
        let mut records = state.performance.clone();
        records.push(record);
        state.performance = aggregate::aggregate(records);
        Ok(())
    }

    /// Overwrite the record at `index` (display order)
    pub fn edit_record(
        &self,
        state: &mut DashboardState,
        index: usize,
        record: PerformanceRecord,
    ) -> Result<()> {
        let slot = state
            .performance
            .get_mut(index)
            .ok_or_else(|| Error::validation(format!("no record at index {}", index)))?;
        *slot = record;
        state.performance = aggregate::aggregate(state.performance.clone());
        Ok(())
    }

    /// Delete the record at `index` (display order)
    pub fn delete_record(&self, state: &mut DashboardState, index: usize) -> Result<PerformanceRecord> {
        if index >= state.performance.len() {
            return Err(Error::validation(format!("no record at index {}", index)));
        }
        Ok(state.performance.remove(index))
    }

    /// Drop all local data
    pub fn reset(&self, state: &mut DashboardState) {
        *state = DashboardState::default();
        info!("dashboard state reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: &str, cat1: &str, rev: f64) -> PerformanceRecord {
        PerformanceRecord {
            month: month.to_string(),
            cat1: cat1.to_string(),
            cat2: "일반".to_string(),
            cat3: "통합".to_string(),
            count: 1,
            rev,
            purchase: 0.0,
            labor: 0.0,
            sga: 0.0,
        }
    }

    #[test]
    fn test_performance_upload_replaces_by_month() {
        let mut state = DashboardState {
            performance: vec![record("2025-01", "B2B", 10.0), record("2025-02", "B2B", 20.0)],
            ..Default::default()
        };
        let csv = "월,대분류,중분류,소분류,매출\n2025-02,B2C,일반,통합,99\n";
        StoreService::new()
            .apply_performance_upload(&mut state, csv.as_bytes())
            .unwrap();
        assert_eq!(state.performance.len(), 2);
        assert_eq!(state.performance[0].month, "2025-01");
        assert_eq!(state.performance[1].cat1, "B2C");
        assert_eq!(state.performance[1].rev, 99.0);
    }

    #[test]
    fn test_failed_upload_leaves_state_untouched() {
        let mut state = DashboardState {
            performance: vec![record("2025-01", "B2B", 10.0)],
            ..Default::default()
        };
        let before = state.clone();
        let csv = "비고\nx\n";
        assert!(StoreService::new()
            .apply_performance_upload(&mut state, csv.as_bytes())
            .is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_unpaid_upload_replaces_wholesale() {
        let mut state = DashboardState::default();
        state.unpaid.push(UnpaidInvoice {
            month: "2024-12".to_string(),
            building_name: "구건물".to_string(),
            project_name: "도장".to_string(),
            invoice_date: "2024-12-01".to_string(),
            supply_amount: 1.0,
        });
        let csv = "등록일,건물명,공사명,매출발행일,공급가액,중분류,수금액,진행상태\n\
                   2025-01-05,한빛타워,방수,2025-01-10,500000,관리건물,,완료\n";
        StoreService::new()
            .apply_unpaid_upload(&mut state, csv.as_bytes())
            .unwrap();
        assert_eq!(state.unpaid.len(), 1);
        assert_eq!(state.unpaid[0].building_name, "한빛타워");
    }

    #[test]
    fn test_add_record_defaults_month_and_folds_in() {
        let store = StoreService::new();
        let mut state = DashboardState::default();
        store.add_record(&mut state, record("2025-01", "B2B", 10.0)).unwrap();
        store.add_record(&mut state, record("2025-01", "B2B", 5.0)).unwrap();
        assert_eq!(state.performance.len(), 1);
        assert_eq!(state.performance[0].rev, 15.0);

        let mut blank_month = record("", "B2B", 1.0);
        blank_month.month = "  ".to_string();
        store.add_record(&mut state, blank_month).unwrap();
        let latest = state.performance.last().unwrap();
        assert_eq!(latest.month, seoul_year_month());
    }

    #[test]
    fn test_add_record_requires_cat1() {
        let mut state = DashboardState::default();
        assert!(StoreService::new()
            .add_record(&mut state, record("2025-01", "", 1.0))
            .is_err());
    }

    #[test]
    fn test_edit_and_delete_by_index() {
        let store = StoreService::new();
        let mut state = DashboardState {
            performance: vec![record("2025-01", "B2B", 10.0), record("2025-02", "B2B", 20.0)],
            ..Default::default()
        };
        store.edit_record(&mut state, 1, record("2025-02", "B2C", 30.0)).unwrap();
        assert_eq!(state.performance[1].cat1, "B2C");
        assert!(store.edit_record(&mut state, 9, record("2025-02", "B2C", 1.0)).is_err());

        let removed = store.delete_record(&mut state, 0).unwrap();
        assert_eq!(removed.month, "2025-01");
        assert_eq!(state.performance.len(), 1);
        assert!(store.delete_record(&mut state, 9).is_err());
    }

    #[test]
    fn test_reset() {
        let store = StoreService::new();
        let mut state = DashboardState {
            performance: vec![record("2025-01", "B2B", 10.0)],
            ..Default::default()
        };
        store.reset(&mut state);
        assert!(state.is_empty());
    }
}
