//! Record classification - performance vs overhead, plus unpaid eligibility

use crate::domain::{NormalizedRow, UnpaidInvoice};

/// Overhead middle category (SGA)
pub const OVERHEAD_CAT2: &str = "판관비";
/// Head-office top category
pub const HEAD_OFFICE_CAT1: &str = "본사";
/// Managed-building middle category
pub const MANAGED_BUILDING_CAT2: &str = "관리건물";
/// Progress status meaning the work is complete
pub const STATUS_COMPLETE: &str = "완료";
/// Progress status meaning the work is still running
pub const STATUS_IN_PROGRESS: &str = "진행";
/// Payment status meaning the invoice is outstanding
pub const PAYMENT_UNPAID: &str = "미수";

/// Primary classification of a normalized record.
///
/// Overhead rows are excluded from per-project profitability rollups;
/// everything else is a performance row by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    Performance,
    Overhead,
}

/// Classify a record as performance or overhead
pub fn classify(row: &NormalizedRow) -> RecordClass {
    classify_fields(&row.cat1, &row.cat2, row.sga)
}

/// Same predicate over a stored dashboard record
pub fn classify_record(record: &crate::domain::PerformanceRecord) -> RecordClass {
    classify_fields(&record.cat1, &record.cat2, record.sga)
}

fn classify_fields(cat1: &str, cat2: &str, sga: f64) -> RecordClass {
    if cat2 == OVERHEAD_CAT2 || cat1 == HEAD_OFFICE_CAT1 || sga > 0.0 {
        RecordClass::Overhead
    } else {
        RecordClass::Performance
    }
}

/// Whether this record also belongs to the unpaid-invoice set.
///
/// Independent of [`classify`]: a row can sit in the performance set and the
/// unpaid set at the same time - two views of one source row.
pub fn is_unpaid_eligible(row: &NormalizedRow) -> bool {
    if row.cat2 != MANAGED_BUILDING_CAT2 || row.progress_status != STATUS_COMPLETE {
        return false;
    }
    if row.invoice_date.is_empty() {
        return false;
    }
    // Blank payment amount counts as unsettled, a positive amount does not
    let unsettled = row.payment_status == PAYMENT_UNPAID
        || match row.payment_amount {
            None => true,
            Some(amount) => amount == 0.0,
        };
    if !unsettled {
        return false;
    }
    !row.building_name.is_empty() || !row.invoice_date.is_empty() || row.supply_amount > 0.0
}

/// Unpaid-invoice view of an eligible record
pub fn to_unpaid_invoice(row: &NormalizedRow) -> Option<UnpaidInvoice> {
    if !is_unpaid_eligible(row) {
        return None;
    }
    Some(UnpaidInvoice {
        month: row.month.clone(),
        building_name: row.building_name.clone(),
        project_name: row.project_name.clone(),
        invoice_date: row.invoice_date.clone(),
        supply_amount: row.supply_amount,
    })
}
