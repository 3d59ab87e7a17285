//! Weekly report service - bucket ledger rows into this/next week

use crate::domain::{WeekWindows, WeeklyItem, WeeklySnapshot};
use crate::services::classify::{STATUS_COMPLETE, STATUS_IN_PROGRESS};

/// A ledger row as far as the weekly report cares: names, lifecycle dates
/// (already normalized to `YYYY-MM-DD`) and the progress status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyRow {
    pub building_name: String,
    pub project_name: String,
    pub progress_date: String,
    pub completion_date: String,
    pub progress_status: String,
}

/// Route rows into the report buckets.
///
/// Completed: status exactly 완료 and completion date inside this week.
/// Scheduled: status exactly 진행 and progress date inside next week.
/// Rows without either name are dropped; everything else is ignored.
pub fn build_snapshot(rows: &[WeeklyRow], windows: &WeekWindows) -> WeeklySnapshot {
    let mut snapshot = WeeklySnapshot {
        week_label: windows.label(),
        ..Default::default()
    };
    let this_monday = windows.this_monday.to_string();
    let this_sunday = windows.this_sunday.to_string();
    let next_monday = windows.next_monday.to_string();
    let next_sunday = windows.next_sunday.to_string();

    for row in rows {
        // either name stands in for a missing one
        let building = non_empty(&row.building_name).or_else(|| non_empty(&row.project_name));
        let project = non_empty(&row.project_name).or_else(|| non_empty(&row.building_name));
        let (Some(building), Some(project)) = (building, project) else {
            continue;
        };
        let item = WeeklyItem {
            building: building.to_string(),
            project: project.to_string(),
            label: format!("{} - {}", building, project),
        };
        if row.progress_status == STATUS_COMPLETE
            && in_range(&row.completion_date, &this_monday, &this_sunday)
        {
            snapshot.complete.push(item);
        } else if row.progress_status == STATUS_IN_PROGRESS
            && in_range(&row.progress_date, &next_monday, &next_sunday)
        {
            snapshot.scheduled.push(item);
        }
    }
    snapshot
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Lexical range check; valid because all three strings are zero-padded
/// `YYYY-MM-DD`. Non-date strings simply never match.
fn in_range(date: &str, start: &str, end: &str) -> bool {
    !date.is_empty() && date >= start && date <= end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn windows() -> WeekWindows {
        // week of Monday 2025-06-09
        WeekWindows::for_date(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap())
    }

    fn row(building: &str, project: &str, progress: &str, completion: &str, status: &str) -> WeeklyRow {
        WeeklyRow {
            building_name: building.to_string(),
            project_name: project.to_string(),
            progress_date: progress.to_string(),
            completion_date: completion.to_string(),
            progress_status: status.to_string(),
        }
    }

    #[test]
    fn test_routing() {
        let rows = vec![
            row("한빛타워", "방수", "", "2025-06-10", "완료"),
            row("세종빌딩", "도장", "2025-06-17", "", "진행"),
            // completed but outside this week
            row("남산타워", "청소", "", "2025-06-20", "완료"),
            // scheduled but this week, not next
            row("북악빌딩", "설비", "2025-06-12", "", "진행"),
            // unknown status
            row("중앙타워", "보수", "2025-06-17", "2025-06-10", "보류"),
        ];
        let snapshot = build_snapshot(&rows, &windows());
        assert_eq!(snapshot.week_label, "2025-06-09 ~ 2025-06-15");
        assert_eq!(snapshot.complete.len(), 1);
        assert_eq!(snapshot.complete[0].label, "한빛타워 - 방수");
        assert_eq!(snapshot.scheduled.len(), 1);
        assert_eq!(snapshot.scheduled[0].building, "세종빌딩");
    }

    #[test]
    fn test_window_boundaries_inclusive() {
        let rows = vec![
            row("a", "p", "", "2025-06-09", "완료"),
            row("b", "p", "", "2025-06-15", "완료"),
            row("c", "p", "", "2025-06-08", "완료"),
            row("d", "p", "2025-06-16", "", "진행"),
            row("e", "p", "2025-06-22", "", "진행"),
            row("f", "p", "2025-06-23", "", "진행"),
        ];
        let snapshot = build_snapshot(&rows, &windows());
        assert_eq!(snapshot.complete.len(), 2);
        assert_eq!(snapshot.scheduled.len(), 2);
    }

    #[test]
    fn test_name_fallbacks() {
        let rows = vec![
            row("한빛타워", "", "", "2025-06-10", "완료"),
            row("", "도장", "", "2025-06-10", "완료"),
            row("", "", "", "2025-06-10", "완료"),
        ];
        let snapshot = build_snapshot(&rows, &windows());
        assert_eq!(snapshot.complete.len(), 2);
        assert_eq!(snapshot.complete[0].label, "한빛타워 - 한빛타워");
        assert_eq!(snapshot.complete[1].label, "도장 - 도장");
    }

    #[test]
    fn test_empty_or_garbage_dates_never_match() {
        let rows = vec![
            row("a", "p", "", "", "완료"),
            row("b", "p", "", "다음주", "완료"),
        ];
        assert!(build_snapshot(&rows, &windows()).is_empty());
    }
}
