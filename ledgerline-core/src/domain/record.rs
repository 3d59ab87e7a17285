//! Performance records and the canonical raw-row-in-flight shape

use serde::{Deserialize, Serialize};

/// Sub-region values that are always reported merged
const MERGED_REGIONS: [&str; 2] = ["강남", "강서"];
/// The merged sub-region label
pub const MERGED_REGION_LABEL: &str = "통합";

/// One stored dashboard row: aggregated monthly figures for one category
/// combination. This is the wire shape the performance table accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    /// `YYYY-MM`; never empty for a stored record
    pub month: String,
    pub cat1: String,
    pub cat2: String,
    pub cat3: String,
    pub count: i64,
    pub rev: f64,
    pub purchase: f64,
    pub labor: f64,
    pub sga: f64,
}

impl PerformanceRecord {
    /// Grouping identity: records sharing this key are summed
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            month: self.month.clone(),
            cat1: self.cat1.clone(),
            cat2: self.cat2.clone(),
            cat3: self.cat3.clone(),
        }
    }

    /// Fold another record with the same key into this one
    pub fn absorb(&mut self, other: &PerformanceRecord) {
        self.count += other.count;
        self.rev += other.rev;
        self.purchase += other.purchase;
        self.labor += other.labor;
        self.sga += other.sga;
    }
}

/// Composite grouping key `(month, cat1, cat2, cat3)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub month: String,
    pub cat1: String,
    pub cat2: String,
    pub cat3: String,
}

/// Canonical record flowing through normalization and classification.
///
/// Every row carries the full field superset (absent fields default to
/// empty/zero) so downstream predicates can test any field without
/// existence checks. `payment_amount` is `None` when the source cell was
/// blank or the column absent; the unpaid classifier treats blank and
/// zero differently from a positive amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    pub month: String,
    pub cat1: String,
    pub cat2: String,
    pub cat3: String,
    pub count: i64,
    pub rev: f64,
    pub purchase: f64,
    pub labor: f64,
    pub sga: f64,
    pub building_name: String,
    pub project_name: String,
    pub invoice_date: String,
    pub progress_status: String,
    pub payment_status: String,
    pub payment_amount: Option<f64>,
    pub supply_amount: f64,
}

impl NormalizedRow {
    /// Project the performance view of this row
    pub fn to_performance(&self) -> PerformanceRecord {
        PerformanceRecord {
            month: self.month.clone(),
            cat1: self.cat1.clone(),
            cat2: self.cat2.clone(),
            cat3: self.cat3.clone(),
            count: self.count,
            rev: self.rev,
            purchase: self.purchase,
            labor: self.labor,
            sga: self.sga,
        }
    }
}

/// Canonicalize a sub-category: the two sub-regions are always merged
pub fn canonicalize_region(cat3: &str) -> String {
    let trimmed = cat3.trim();
    if MERGED_REGIONS.contains(&trimmed) {
        MERGED_REGION_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_canonicalization() {
        assert_eq!(canonicalize_region("강남"), "통합");
        assert_eq!(canonicalize_region(" 강서 "), "통합");
        assert_eq!(canonicalize_region("공사"), "공사");
        assert_eq!(canonicalize_region(""), "");
    }

    #[test]
    fn test_absorb_sums_measures() {
        let mut a = PerformanceRecord {
            month: "2025-06".into(),
            cat1: "B2B".into(),
            cat2: "관리건물".into(),
            cat3: "통합".into(),
            count: 2,
            rev: 100.0,
            purchase: 30.0,
            labor: 20.0,
            sga: 0.0,
        };
        let b = PerformanceRecord { count: 1, rev: 200.0, ..a.clone() };
        a.absorb(&b);
        assert_eq!(a.count, 3);
        assert_eq!(a.rev, 300.0);
        assert_eq!(a.purchase, 60.0);
    }

    #[test]
    fn test_group_key_equality() {
        let a = PerformanceRecord {
            month: "2025-01".into(),
            cat1: "B2C".into(),
            cat2: "일반".into(),
            cat3: "통합".into(),
            count: 0,
            rev: 0.0,
            purchase: 0.0,
            labor: 0.0,
            sga: 0.0,
        };
        let b = PerformanceRecord { rev: 999.0, ..a.clone() };
        assert_eq!(a.group_key(), b.group_key());
    }
}
