//! Aggregation service - group-and-sum and month-scoped merging
//!
//! Pre-aggregated uploads pass through mostly unchanged; ledger uploads are
//! filtered, then collapsed into one record per (month, cat1, cat2, cat3).
//! Merging is replace-by-month: an upload is authoritative for every month
//! it mentions and silent months are left alone.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::domain::{GroupKey, NormalizedRow, PerformanceRecord};
use crate::services::classify::{HEAD_OFFICE_CAT1, OVERHEAD_CAT2, STATUS_COMPLETE};
use crate::services::import::{IngestMode, PerformanceBatch};

/// Ledger exports reach back years; only rows from this month forward are
/// trusted to be complete.
pub const LEDGER_FLOOR_MONTH: &str = "2024-01";

/// Collapse records sharing a group key by summing their measures. Output
/// order is the key order, so equal inputs always aggregate identically.
pub fn aggregate(records: impl IntoIterator<Item = PerformanceRecord>) -> Vec<PerformanceRecord> {
    let mut grouped: BTreeMap<GroupKey, PerformanceRecord> = BTreeMap::new();
    for record in records {
        match grouped.get_mut(&record.group_key()) {
            Some(existing) => existing.absorb(&record),
            None => {
                grouped.insert(record.group_key(), record);
            }
        }
    }
    grouped.into_values().collect()
}

/// Turn a parsed upload into aggregated performance records, applying the
/// ledger-mode business filter when needed.
pub fn records_from_batch(batch: &PerformanceBatch) -> Vec<PerformanceRecord> {
    let records = batch.rows.iter().filter_map(|row| {
        if batch.mode == IngestMode::Ledger && !ledger_row_counts(row) {
            return None;
        }
        Some(row.to_performance())
    });
    let aggregated = aggregate(records);
    debug!(
        "{} upload rows aggregated into {} records",
        batch.rows.len(),
        aggregated.len()
    );
    aggregated
}

/// Ledger rows only count toward the dashboard when the project finished,
/// is not head-office or overhead bookkeeping, and is recent enough.
fn ledger_row_counts(row: &NormalizedRow) -> bool {
    row.progress_status == STATUS_COMPLETE
        && row.cat1 != HEAD_OFFICE_CAT1
        && row.cat2 != OVERHEAD_CAT2
        && row.month.as_str() >= LEDGER_FLOOR_MONTH
}

/// Replace-by-month merge: drop existing records for every month the
/// incoming set mentions, then append the incoming records. The result is
/// re-sorted by group key.
pub fn merge_months(
    existing: &[PerformanceRecord],
    incoming: &[PerformanceRecord],
) -> Vec<PerformanceRecord> {
    let replaced: BTreeSet<&str> = incoming.iter().map(|r| r.month.as_str()).collect();
    let mut merged: Vec<PerformanceRecord> = existing
        .iter()
        .filter(|r| !replaced.contains(r.month.as_str()))
        .cloned()
        .collect();
    merged.extend_from_slice(incoming);
    merged.sort_by(|a, b| a.group_key().cmp(&b.group_key()));
    merged
}
