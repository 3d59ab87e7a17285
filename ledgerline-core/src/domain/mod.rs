//! Core domain entities
//!
//! Pure data structures with their validation and projection logic - no I/O
//! or external dependencies.

mod record;
mod unpaid;
pub mod result;
pub mod weekly;

pub use record::{canonicalize_region, GroupKey, NormalizedRow, PerformanceRecord, MERGED_REGION_LABEL};
pub use unpaid::UnpaidInvoice;
pub use weekly::{seoul_today, seoul_year_month, WeekWindows, WeeklyItem, WeeklySnapshot};
