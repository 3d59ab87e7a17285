//! Weekly report domain model and Monday-start week windows

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Business dates are anchored to Asia/Seoul, which has no DST
const SEOUL_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// One project row in the weekly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyItem {
    pub building: String,
    pub project: String,
    /// Display label, `"{building} - {project}"`
    pub label: String,
}

/// The single weekly report snapshot (replace-on-write, never appended)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySnapshot {
    pub week_label: String,
    /// Completed this week (status 완료, completion date in this window)
    pub complete: Vec<WeeklyItem>,
    /// Scheduled next week (status 진행, progress date in next window)
    pub scheduled: Vec<WeeklyItem>,
}

impl WeeklySnapshot {
    pub fn is_empty(&self) -> bool {
        self.complete.is_empty() && self.scheduled.is_empty()
    }

    /// Render the report as CSV (구분, 건물명, 공사명), fields quoted
    pub fn to_csv(&self) -> String {
        let mut out = String::from("\"구분\",\"건물명\",\"공사명\"\n");
        for item in &self.complete {
            out.push_str(&csv_line("완료", &item.building, &item.project));
        }
        for item in &self.scheduled {
            out.push_str(&csv_line("예정", &item.building, &item.project));
        }
        out
    }
}

fn csv_line(kind: &str, building: &str, project: &str) -> String {
    format!(
        "\"{}\",\"{}\",\"{}\"\n",
        kind,
        building.replace('"', "\"\""),
        project.replace('"', "\"\"")
    )
}

/// The current and following Monday-start 7-day windows
#[derive(Debug, Clone, PartialEq)]
pub struct WeekWindows {
    pub this_monday: NaiveDate,
    pub this_sunday: NaiveDate,
    pub next_monday: NaiveDate,
    pub next_sunday: NaiveDate,
}

impl WeekWindows {
    /// Compute windows for the week containing `today`.
    ///
    /// Monday-start rule: Sunday counts as offset 6 from the preceding
    /// Monday, any other weekday as `weekday - 1`.
    pub fn for_date(today: NaiveDate) -> Self {
        let offset = match today.weekday() {
            Weekday::Sun => 6,
            wd => wd.num_days_from_monday() as i64,
        };
        let this_monday = today - Duration::days(offset);
        let this_sunday = this_monday + Duration::days(6);
        let next_monday = this_monday + Duration::days(7);
        let next_sunday = next_monday + Duration::days(6);
        Self {
            this_monday,
            this_sunday,
            next_monday,
            next_sunday,
        }
    }

    /// Windows for today in the business timezone
    pub fn current() -> Self {
        Self::for_date(seoul_today())
    }

    /// `"{this_monday} ~ {this_sunday}"`
    pub fn label(&self) -> String {
        format!("{} ~ {}", self.this_monday, self.this_sunday)
    }
}

/// Today's date in Asia/Seoul
pub fn seoul_today() -> NaiveDate {
    let offset = FixedOffset::east_opt(SEOUL_UTC_OFFSET_SECS).unwrap();
    Utc::now().with_timezone(&offset).date_naive()
}

/// Current `YYYY-MM` in Asia/Seoul
pub fn seoul_year_month() -> String {
    seoul_today().format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_midweek() {
        // Wednesday
        let windows = WeekWindows::for_date(NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert_eq!(windows.this_monday, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert_eq!(windows.this_sunday, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(windows.next_monday, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());
        assert_eq!(windows.next_sunday, NaiveDate::from_ymd_opt(2025, 6, 22).unwrap());
        assert_eq!(windows.label(), "2025-06-09 ~ 2025-06-15");
    }

    #[test]
    fn test_windows_sunday_belongs_to_preceding_monday() {
        let windows = WeekWindows::for_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(windows.this_monday, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert_eq!(windows.this_sunday, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn test_windows_monday_starts_its_own_week() {
        let windows = WeekWindows::for_date(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
        assert_eq!(windows.this_monday, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
    }

    #[test]
    fn test_csv_export_quotes_and_orders() {
        let snapshot = WeeklySnapshot {
            week_label: "2025-06-09 ~ 2025-06-15".into(),
            complete: vec![WeeklyItem {
                building: "한빛타워".into(),
                project: "옥상 \"방수\"".into(),
                label: "한빛타워 - 옥상 \"방수\"".into(),
            }],
            scheduled: vec![WeeklyItem {
                building: "세종빌딩".into(),
                project: "도장".into(),
                label: "세종빌딩 - 도장".into(),
            }],
        };
        let csv = snapshot.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"완료\""));
        assert!(lines[1].contains("\"\"방수\"\""));
        assert!(lines[2].starts_with("\"예정\""));
    }
}
