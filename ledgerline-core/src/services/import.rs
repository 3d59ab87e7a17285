//! Import service - CSV ingestion for dashboard, unpaid and weekly uploads
//!
//! Uploads arrive as whole files exported from spreadsheets with Korean or
//! English column names. Ingestion is header-driven: raw headers are
//! normalized and matched against per-target synonym tables, unmatched
//! columns are ignored, and each surviving record is normalized into the
//! canonical field superset before classification.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{EUC_KR, UTF_8};
use log::{debug, warn};
use regex::Regex;

use crate::domain::result::{Error, Result};
use crate::domain::{canonicalize_region, NormalizedRow, WeekWindows, WeeklySnapshot};
use crate::services::classify;
use crate::services::weekly::{self, WeeklyRow};

/// Canonical targets a raw CSV column can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Month,
    Cat1,
    Cat2,
    Cat3,
    Count,
    Rev,
    Purchase,
    Labor,
    Sga,
    BuildingName,
    ProjectName,
    InvoiceDate,
    ProgressStatus,
    PaymentStatus,
    PaymentAmount,
    SupplyAmount,
    ProgressDate,
    CompletionDate,
}

/// Which synonym table applies to an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Dashboard,
    Unpaid,
    Weekly,
}

/// How a performance upload is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// One row per (month, category) combination, measures pre-summed
    Aggregated,
    /// One row per project/ticket; needs client-side aggregation
    Ledger,
}

/// Result of parsing a performance upload
#[derive(Debug)]
pub struct PerformanceBatch {
    pub mode: IngestMode,
    pub rows: Vec<NormalizedRow>,
    pub rows_read: usize,
    pub headers: Vec<String>,
}

/// Result of parsing an unpaid-invoice upload
#[derive(Debug)]
pub struct UnpaidBatch {
    pub invoices: Vec<crate::domain::UnpaidInvoice>,
    pub rows_read: usize,
    pub headers: Vec<String>,
}

/// CSV ingestion service. Stateless; all parsing is a synchronous batch
/// operation over the whole file.
#[derive(Debug, Default)]
pub struct ImportService;

impl ImportService {
    pub fn new() -> Self {
        Self
    }

    /// Parse a performance upload (pre-aggregated or raw ledger, sniffed
    /// from the headers). Retries with EUC-KR when UTF-8 yields nothing.
    pub fn parse_performance(&self, bytes: &[u8]) -> Result<PerformanceBatch> {
        let mut diag = (0usize, Vec::new());
        let mut diag_clean = false;
        for (text, lossy) in decode_attempts(bytes) {
            let (headers, records) = read_records(&text)?;
            let keys = build_header_keys(&headers, MapKind::Dashboard);
            let mode = sniff_mode(&keys);
            let rows: Vec<NormalizedRow> = records
                .iter()
                .filter_map(|record| map_row(record, &keys, MapKind::Dashboard, mode))
                .collect();
            debug!(
                "performance upload: {} of {} rows usable ({:?} mode)",
                rows.len(),
                records.len(),
                mode
            );
            if !rows.is_empty() {
                return Ok(PerformanceBatch {
                    mode,
                    rows,
                    rows_read: records.len(),
                    headers,
                });
            }
            // report the first cleanly decoded attempt, not a reinterpretation
            if !diag_clean {
                diag = (records.len(), headers);
                diag_clean = !lossy;
            }
        }
        Err(Error::parse(
            "no usable rows; check the month column and header names",
            diag.0,
            diag.1,
        ))
    }

    /// Parse an unpaid-invoice upload and keep only eligible rows
    /// (managed building, complete, invoice issued, payment outstanding).
    pub fn parse_unpaid(&self, bytes: &[u8]) -> Result<UnpaidBatch> {
        let mut diag = (0usize, Vec::new());
        let mut diag_clean = false;
        for (text, lossy) in decode_attempts(bytes) {
            let (headers, records) = read_records(&text)?;
            let keys = build_header_keys(&headers, MapKind::Unpaid);
            let invoices: Vec<_> = records
                .iter()
                .filter_map(|record| map_row(record, &keys, MapKind::Unpaid, IngestMode::Aggregated))
                .filter_map(|row| classify::to_unpaid_invoice(&row))
                .collect();
            if !invoices.is_empty() {
                return Ok(UnpaidBatch {
                    invoices,
                    rows_read: records.len(),
                    headers,
                });
            }
            if !diag_clean {
                diag = (records.len(), headers);
                diag_clean = !lossy;
            }
        }
        Err(Error::parse(
            "no eligible unpaid rows; expected 중분류=관리건물, 진행상태=완료 and an unsettled payment",
            diag.0,
            diag.1,
        ))
    }

    /// Parse a weekly-report ledger upload and bucket rows into the given
    /// week windows. Fails when nothing lands in either bucket.
    pub fn parse_weekly(&self, bytes: &[u8], windows: &WeekWindows) -> Result<WeeklySnapshot> {
        let mut diag = (0usize, Vec::new());
        let mut diag_clean = false;
        for (text, lossy) in decode_attempts(bytes) {
            let (headers, records) = read_records(&text)?;
            let keys = build_header_keys(&headers, MapKind::Weekly);
            let rows: Vec<WeeklyRow> = records
                .iter()
                .map(|record| map_weekly_row(record, &keys))
                .collect();
            let snapshot = weekly::build_snapshot(&rows, windows);
            if !snapshot.is_empty() {
                return Ok(snapshot);
            }
            if !diag_clean {
                diag = (records.len(), headers);
                diag_clean = !lossy;
            }
        }
        Err(Error::parse(
            "no rows fell into this or next week; expected 진행상태, 완료일/진행일, 건물명/공사명 columns",
            diag.0,
            diag.1,
        ))
    }
}

/// Uploads must be CSV files; spreadsheets have to be exported first
pub fn ensure_csv_path(path: &Path) -> Result<()> {
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "only .csv files can be uploaded: {}",
            path.display()
        )))
    }
}

/// Decode attempts in priority order: UTF-8 first, then the legacy
/// regional encoding older Excel versions export. The flag marks lossy
/// decodes; error diagnostics must come from a clean one.
fn decode_attempts(bytes: &[u8]) -> Vec<(String, bool)> {
    let (utf8, _, utf8_malformed) = UTF_8.decode(bytes);
    let mut attempts = vec![(utf8.into_owned(), utf8_malformed)];
    let (euc, _, euc_malformed) = EUC_KR.decode(bytes);
    if !euc_malformed && (utf8_malformed || euc != attempts[0].0) {
        attempts.push((euc.into_owned(), false));
    }
    if utf8_malformed {
        warn!("upload is not valid UTF-8, retrying as EUC-KR");
    }
    attempts
}

fn read_records(text: &str) -> Result<(Vec<String>, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::parse(format!("unreadable CSV header: {}", e), 0, Vec::new()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| Error::parse(format!("unreadable CSV row: {}", e), records.len(), headers.clone()))?;
        // skip fully empty lines
        if record.iter().any(|f| !f.is_empty()) {
            records.push(record);
        }
    }
    Ok((headers, records))
}

/// Normalize a raw header for synonym lookup: trim, lowercase, strip
/// internal whitespace, the punctuation set `()_-./` and zero-width
/// characters. Idempotent.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| !matches!(c, '(' | ')' | '_' | '-' | '.' | '/'))
        .filter(|c| !('\u{200b}'..='\u{200d}').contains(c))
        .collect()
}

/// Resolve each header position to a canonical key (or None to ignore the
/// column). Two raw headers may resolve to the same key; the later column
/// wins during row mapping - an accepted quirk of the source data.
pub fn build_header_keys(headers: &[String], kind: MapKind) -> Vec<Option<FieldKey>> {
    headers.iter().map(|h| field_for_header(h, kind)).collect()
}

fn field_for_header(raw: &str, kind: MapKind) -> Option<FieldKey> {
    let key = normalize_header(raw);
    let k = key.as_str();
    let f = raw.trim();
    let mut out = None;

    match kind {
        MapKind::Dashboard => {
            if ["월", "month", "yyyymm", "date", "기간"].contains(&k) {
                out = Some(FieldKey::Month);
            }
            if ["대분류", "cat1"].contains(&k) {
                out = Some(FieldKey::Cat1);
            }
            if ["중분류", "cat2"].contains(&k) {
                out = Some(FieldKey::Cat2);
            }
            if ["소분류", "cat3"].contains(&k) {
                out = Some(FieldKey::Cat3);
            }
            if ["건수", "count"].contains(&k) {
                out = Some(FieldKey::Count);
            }
            if ["매출", "매출원", "rev", "revenue"].contains(&k) {
                out = Some(FieldKey::Rev);
            }
            if ["매입", "매입원", "purchase", "cost"].contains(&k) {
                out = Some(FieldKey::Purchase);
            }
            if ["사업소득", "노무비", "labor"].contains(&k) {
                out = Some(FieldKey::Labor);
            }
            if ["판관비", "sga"].contains(&k) {
                out = Some(FieldKey::Sga);
            }
            if ["건물명", "buildingname"].contains(&k) {
                out = Some(FieldKey::BuildingName);
            }
            if ["프로젝트명", "공사명", "projectname"].contains(&k) {
                out = Some(FieldKey::ProjectName);
            }
            if ["매출발행일", "매출발행", "invoicedate"].contains(&k)
                || (f.contains("매출") && f.contains("발행"))
            {
                out = Some(FieldKey::InvoiceDate);
            }
            if ["진행상태", "progressstatus"].contains(&k) {
                out = Some(FieldKey::ProgressStatus);
            }
            if ["수금상태", "paymentstatus"].contains(&k) {
                out = Some(FieldKey::PaymentStatus);
            }
            if ["수금액", "paymentamount"].contains(&k) {
                out = Some(FieldKey::PaymentAmount);
            }
            if ["공급가액", "supplyamount"].contains(&k) {
                out = Some(FieldKey::SupplyAmount);
            }
            // Ledger-shaped exports carry per-project date columns; these
            // drive mode sniffing and month derivation.
            if ["진행일", "progressdate", "예정일", "매출예정일", "착수예정일"].contains(&k)
                || ((f.contains("진행") || f.contains("예정"))
                    && f.contains("일")
                    && !f.contains("상태"))
            {
                out = Some(FieldKey::ProgressDate);
            }
            if ["완료일", "completiondate", "매출완료일", "실제완료일"].contains(&k)
                || (f.contains("완료") && f.contains("일"))
            {
                out = Some(FieldKey::CompletionDate);
            }
        }
        MapKind::Unpaid => {
            if ["월", "month", "yyyymm", "date", "기간", "등록일", "완료일"].contains(&k) {
                out = Some(FieldKey::Month);
            }
            if ["건물명", "buildingname"].contains(&k) {
                out = Some(FieldKey::BuildingName);
            }
            if ["프로젝트명", "공사명", "projectname"].contains(&k) {
                out = Some(FieldKey::ProjectName);
            }
            if ["매출발행일", "매출발행", "invoicedate"].contains(&k)
                || (f.contains("매출") && f.contains("발행"))
            {
                out = Some(FieldKey::InvoiceDate);
            }
            if ["공급가액", "supplyamount", "매출공급", "매출공급가액", "매출공급가"].contains(&k)
                || (f.contains("매출") && f.contains("공급") && !f.contains("부가"))
            {
                out = Some(FieldKey::SupplyAmount);
            }
            if ["중분류", "cat2"].contains(&k) {
                out = Some(FieldKey::Cat2);
            }
            if ["수금상태", "수금현황", "paymentstatus"].contains(&k) {
                out = Some(FieldKey::PaymentStatus);
            }
            if ["수금액", "paymentamount"].contains(&k) {
                out = Some(FieldKey::PaymentAmount);
            }
            if ["진행상태", "progressstatus"].contains(&k) {
                out = Some(FieldKey::ProgressStatus);
            }
        }
        MapKind::Weekly => {
            if ["건물명", "buildingname"].contains(&k) {
                out = Some(FieldKey::BuildingName);
            }
            if ["공사명", "프로젝트명", "projectname"].contains(&k) {
                out = Some(FieldKey::ProjectName);
            }
            if ["진행일", "progressdate", "예정일", "매출예정일", "착수예정일"].contains(&k)
                || ((f.contains("진행") || f.contains("예정"))
                    && f.contains("일")
                    && !f.contains("상태"))
            {
                out = Some(FieldKey::ProgressDate);
            }
            if ["완료일", "completiondate", "매출완료일", "실제완료일"].contains(&k)
                || (f.contains("완료") && f.contains("일"))
            {
                out = Some(FieldKey::CompletionDate);
            }
            if ["진행상태", "progressstatus"].contains(&k) {
                out = Some(FieldKey::ProgressStatus);
            }
        }
    }
    out
}

/// A ledger-shaped export carries a per-project date column alongside a top
/// category and a revenue column; otherwise the upload is pre-aggregated.
fn sniff_mode(keys: &[Option<FieldKey>]) -> IngestMode {
    let has = |k: FieldKey| keys.iter().any(|x| *x == Some(k));
    let has_date =
        has(FieldKey::CompletionDate) || has(FieldKey::InvoiceDate) || has(FieldKey::ProgressDate);
    if has_date && has(FieldKey::Cat1) && has(FieldKey::Rev) {
        IngestMode::Ledger
    } else {
        IngestMode::Aggregated
    }
}

/// Map one CSV record into the canonical superset, or None when the row has
/// no resolvable month (the only hard rejection in normalization).
fn map_row(
    record: &StringRecord,
    keys: &[Option<FieldKey>],
    kind: MapKind,
    mode: IngestMode,
) -> Option<NormalizedRow> {
    let mut row = NormalizedRow::default();
    // `None` = blank cell or absent column, which the unpaid classifier
    // must distinguish from an explicit zero
    let mut payment_amount_raw: Option<String> = None;
    let mut progress_date = String::new();
    let mut completion_date = String::new();

    for (i, key) in keys.iter().enumerate() {
        let Some(key) = key else { continue };
        let val = record.get(i).unwrap_or("").trim();
        match key {
            FieldKey::Month => {
                row.month = if kind == MapKind::Unpaid {
                    truncate_to_month(val)
                } else {
                    val.to_string()
                }
            }
            FieldKey::Cat1 => row.cat1 = val.to_string(),
            FieldKey::Cat2 => row.cat2 = val.to_string(),
            FieldKey::Cat3 => row.cat3 = val.to_string(),
            FieldKey::Count => row.count = to_number(val) as i64,
            FieldKey::Rev => row.rev = to_number(val),
            FieldKey::Purchase => row.purchase = to_number(val),
            FieldKey::Labor => row.labor = to_number(val),
            FieldKey::Sga => row.sga = to_number(val),
            FieldKey::BuildingName => row.building_name = val.to_string(),
            FieldKey::ProjectName => row.project_name = val.to_string(),
            FieldKey::InvoiceDate => row.invoice_date = val.to_string(),
            FieldKey::ProgressStatus => row.progress_status = val.to_string(),
            FieldKey::PaymentStatus => row.payment_status = val.to_string(),
            FieldKey::PaymentAmount => payment_amount_raw = Some(val.to_string()),
            FieldKey::SupplyAmount => row.supply_amount = to_number(val),
            FieldKey::ProgressDate => progress_date = parse_date_ymd(val),
            FieldKey::CompletionDate => completion_date = parse_date_ymd(val),
        }
    }

    if mode == IngestMode::Ledger {
        // One source row = one project; the month comes from whichever
        // lifecycle date the export carries.
        let date = if !completion_date.is_empty() {
            completion_date
        } else if !row.invoice_date.is_empty() {
            parse_date_ymd(&row.invoice_date)
        } else {
            progress_date
        };
        row.month = truncate_to_month(&date);
        row.count = 1;
    }

    // Performance rows are keyed by month; unpaid eligibility is not,
    // so an unpaid row with a blank month cell is still kept.
    if row.month.is_empty() && kind != MapKind::Unpaid {
        return None;
    }

    row.cat3 = canonicalize_region(&row.cat3);
    row.payment_amount = payment_amount_raw
        .filter(|s| !s.is_empty())
        .map(|s| to_number(&s));
    Some(row)
}

fn map_weekly_row(record: &StringRecord, keys: &[Option<FieldKey>]) -> WeeklyRow {
    let mut row = WeeklyRow::default();
    for (i, key) in keys.iter().enumerate() {
        let Some(key) = key else { continue };
        let val = record.get(i).unwrap_or("").trim();
        match key {
            FieldKey::BuildingName => row.building_name = val.to_string(),
            FieldKey::ProjectName => row.project_name = val.to_string(),
            FieldKey::ProgressDate => row.progress_date = parse_date_ymd(val),
            FieldKey::CompletionDate => row.completion_date = parse_date_ymd(val),
            FieldKey::ProgressStatus => row.progress_status = val.to_string(),
            _ => {}
        }
    }
    row
}

/// Coerce a spreadsheet cell to a number: strip thousands separators, trim,
/// parse as float. Unparsable or blank input is 0 - never an error.
pub fn to_number(value: &str) -> f64 {
    let cleaned = value.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Best-effort normalization of a date cell to zero-padded `YYYY-MM-DD`.
/// Values that do not look like a date are returned trimmed as-is; they
/// will simply fail later lexical range comparisons.
pub fn parse_date_ymd(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let re = Regex::new(r"(\d{4})[-/]?(\d{1,2})[-/]?(\d{1,2})").unwrap();
    match re.captures(trimmed) {
        Some(caps) => format!("{}-{:0>2}-{:0>2}", &caps[1], &caps[2], &caps[3]),
        None => trimmed.to_string(),
    }
}

/// Truncate a date-ish cell to `YYYY-MM` when possible, else keep it as-is
fn truncate_to_month(value: &str) -> String {
    let trimmed = value.trim();
    let re = Regex::new(r"^(\d{4})-(\d{1,2})").unwrap();
    match re.captures(trimmed) {
        Some(caps) => format!("{}-{:0>2}", &caps[1], &caps[2]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_strips_noise() {
        assert_eq!(normalize_header("  매출 (공급가액) "), "매출공급가액");
        assert_eq!(normalize_header("Building_Name"), "buildingname");
        assert_eq!(normalize_header("invoice-date"), "invoicedate");
        assert_eq!(normalize_header("월\u{200b}"), "월");
    }

    #[test]
    fn test_normalize_header_is_idempotent() {
        for raw in ["  매출 (공급가액) ", "Building_Name", "월", "REV."] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once);
        }
    }

    #[test]
    fn test_to_number_robustness() {
        assert_eq!(to_number("1,234,567"), 1_234_567.0);
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
        assert_eq!(to_number("abc"), 0.0);
        assert_eq!(to_number("12.5"), 12.5);
    }

    #[test]
    fn test_parse_date_ymd_variants() {
        assert_eq!(parse_date_ymd("2025-6-1"), "2025-06-01");
        assert_eq!(parse_date_ymd("2025/06/11"), "2025-06-11");
        assert_eq!(parse_date_ymd("20250611"), "2025-06-11");
        assert_eq!(parse_date_ymd("다음주"), "다음주");
        assert_eq!(parse_date_ymd(""), "");
    }

    #[test]
    fn test_unmatched_headers_are_ignored() {
        let headers = vec!["월".to_string(), "비고".to_string(), "매출".to_string()];
        let keys = build_header_keys(&headers, MapKind::Dashboard);
        assert_eq!(keys[0], Some(FieldKey::Month));
        assert_eq!(keys[1], None);
        assert_eq!(keys[2], Some(FieldKey::Rev));
    }

    #[test]
    fn test_invoice_date_substring_fallback() {
        let keys = build_header_keys(&["매출 발행 일자".to_string()], MapKind::Dashboard);
        assert_eq!(keys[0], Some(FieldKey::InvoiceDate));
    }

    #[test]
    fn test_weekly_progress_date_fallback_excludes_status() {
        let keys = build_header_keys(
            &["진행 예정일".to_string(), "진행상태".to_string()],
            MapKind::Weekly,
        );
        assert_eq!(keys[0], Some(FieldKey::ProgressDate));
        assert_eq!(keys[1], Some(FieldKey::ProgressStatus));
    }

    #[test]
    fn test_parse_performance_aggregated() {
        let csv = "월,대분류,중분류,소분류,건수,매출,매입\n\
                   2025-06,B2B,일반,강남,2,\"1,000\",300\n\
                   ,B2B,일반,강남,1,500,100\n";
        let batch = ImportService::new().parse_performance(csv.as_bytes()).unwrap();
        assert_eq!(batch.mode, IngestMode::Aggregated);
        // the empty-month row is rejected
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows_read, 2);
        let row = &batch.rows[0];
        assert_eq!(row.month, "2025-06");
        assert_eq!(row.cat3, "통합");
        assert_eq!(row.rev, 1000.0);
        assert_eq!(row.count, 2);
    }

    #[test]
    fn test_parse_performance_sniffs_ledger_mode() {
        let csv = "완료일,대분류,중분류,소분류,매출,진행상태\n\
                   2025-06-12,B2B,일반,강남,700,완료\n";
        let batch = ImportService::new().parse_performance(csv.as_bytes()).unwrap();
        assert_eq!(batch.mode, IngestMode::Ledger);
        let row = &batch.rows[0];
        assert_eq!(row.month, "2025-06");
        assert_eq!(row.count, 1);
    }

    #[test]
    fn test_parse_performance_rejects_unusable_file() {
        let csv = "비고,메모\nx,y\n";
        let err = ImportService::new().parse_performance(csv.as_bytes()).unwrap_err();
        match err {
            Error::Parse { rows_read, headers, .. } => {
                assert_eq!(rows_read, 1);
                assert_eq!(headers, vec!["비고", "메모"]);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_performance_euc_kr_fallback() {
        let csv = "월,매출\n2025-01,100\n";
        let (encoded, _, _) = EUC_KR.encode(csv);
        // ASCII-only content is identical in both encodings; use a Korean
        // header to force the UTF-8 attempt to fail
        let korean = "월,매출,소분류\n2025-01,100,강남\n";
        let (encoded_kr, _, _) = EUC_KR.encode(korean);
        for bytes in [encoded.as_ref(), encoded_kr.as_ref()] {
            let batch = ImportService::new().parse_performance(bytes).unwrap();
            assert_eq!(batch.rows.len(), 1);
            assert_eq!(batch.rows[0].month, "2025-01");
        }
    }

    #[test]
    fn test_unusable_euc_kr_file_reports_decoded_headers() {
        let csv = "비고,메모\nx,y\n";
        let (encoded, _, _) = EUC_KR.encode(csv);
        let err = ImportService::new().parse_performance(&encoded).unwrap_err();
        match err {
            Error::Parse { rows_read, headers, .. } => {
                assert_eq!(rows_read, 1);
                assert_eq!(headers, vec!["비고", "메모"]);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_payment_amount_survives_normalization() {
        let csv = "월,중분류,진행상태,매출발행일,수금액,수금상태\n\
                   2025-01,관리건물,완료,2025-01-10,,\n\
                   2025-01,관리건물,완료,2025-01-11,0,\n\
                   2025-01,관리건물,완료,2025-01-12,50000,\n";
        let batch = ImportService::new().parse_performance(csv.as_bytes()).unwrap();
        assert_eq!(batch.rows[0].payment_amount, None);
        assert_eq!(batch.rows[1].payment_amount, Some(0.0));
        assert_eq!(batch.rows[2].payment_amount, Some(50_000.0));
    }

    #[test]
    fn test_duplicate_headers_last_wins() {
        let csv = "월,매출,rev\n2025-01,100,200\n";
        let batch = ImportService::new().parse_performance(csv.as_bytes()).unwrap();
        assert_eq!(batch.rows[0].rev, 200.0);
    }

    #[test]
    fn test_parse_unpaid_keeps_only_eligible() {
        let csv = "등록일,건물명,공사명,매출발행일,공급가액,중분류,수금액,진행상태\n\
                   2025-01-05,한빛타워,방수,2025-01-10,500000,관리건물,,완료\n\
                   2025-01-06,세종빌딩,도장,2025-01-11,300000,관리건물,300000,완료\n\
                   2025-01-07,일반빌딩,도장,2025-01-12,100000,일반,,완료\n";
        let batch = ImportService::new().parse_unpaid(csv.as_bytes()).unwrap();
        assert_eq!(batch.invoices.len(), 1);
        assert_eq!(batch.invoices[0].building_name, "한빛타워");
        assert_eq!(batch.invoices[0].month, "2025-01");
        assert_eq!(batch.rows_read, 3);
    }

    #[test]
    fn test_parse_unpaid_keeps_eligible_rows_without_month() {
        let csv = "건물명,공사명,매출발행일,공급가액,중분류,수금액,진행상태\n\
                   한빛타워,방수,2025-01-10,500000,관리건물,,완료\n";
        let batch = ImportService::new().parse_unpaid(csv.as_bytes()).unwrap();
        assert_eq!(batch.invoices.len(), 1);
        assert_eq!(batch.invoices[0].building_name, "한빛타워");
        assert_eq!(batch.invoices[0].month, "");
    }

    #[test]
    fn test_parse_unpaid_rejects_when_nothing_eligible() {
        let csv = "월,건물명\n2025-01,한빛타워\n";
        assert!(ImportService::new().parse_unpaid(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_ensure_csv_path() {
        assert!(ensure_csv_path(Path::new("upload.csv")).is_ok());
        assert!(ensure_csv_path(Path::new("upload.CSV")).is_ok());
        assert!(ensure_csv_path(Path::new("upload.xlsx")).is_err());
        assert!(ensure_csv_path(Path::new("upload")).is_err());
    }
}
