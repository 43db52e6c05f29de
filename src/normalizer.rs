use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::error::{BridgeError, Result};
use crate::models::{CanonicalRecord, CanonicalTable, RawExport, SourceFile};

/// Report title, charity details and date range printed above the column header.
pub const METADATA_ROWS: usize = 11;
/// Totals block printed below the last donation.
pub const FOOTER_ROWS: usize = 4;
pub const DATE_COLUMN: usize = 2;
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// A row is kept when any of date, first name or last name is present.
const PRESENCE_COLUMNS: [usize; 3] = [2, 3, 4];
const MIN_COLUMNS: usize = 5;
/// Earliest year a parsed date may carry; anything lower is a short `%Y` match.
const MIN_YEAR: i32 = 1000;

const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// Month-first formats are tried before year-first ones and two-digit years
// before four-digit ones. `%Y` also accepts one to three digits, so any parse
// landing before year 1000 is rejected in `parse_date`.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%B %d, %y",
    "%B %d, %Y",
    "%B %d %y",
    "%B %d %Y",
    "%d %B %y",
    "%d %B %Y",
    "%d %B, %y",
    "%d %B, %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%a, %d %b %y",
    "%a, %d %b %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// True for blank cells and the usual spreadsheet "no value" markers.
pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Lenient date parsing across the formats donation platforms export.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if is_missing(s) {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if d.year() >= MIN_YEAR {
                return Some(d);
            }
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if dt.year() >= MIN_YEAR {
                return Some(dt.date());
            }
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Split an uploaded file into rows. Blank lines are not rows.
pub fn read_export(file: &SourceFile) -> Result<RawExport> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file.bytes.as_slice());
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawExport {
        name: file.name.clone(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Strip the report boilerplate, drop empty donations and rewrite the
/// donation date as MM/DD/YYYY.
pub fn normalize(raw: RawExport) -> Result<CanonicalTable> {
    let RawExport { name, rows } = raw;
    let min_rows = METADATA_ROWS + 1 + FOOTER_ROWS;
    if rows.len() < min_rows {
        return Err(BridgeError::structural(
            &name,
            format!(
                "expected at least {min_rows} rows (report header, column header, totals), found {}",
                rows.len()
            ),
        ));
    }

    let mut body = rows.into_iter().skip(METADATA_ROWS);
    let headers: Vec<String> = body.next().unwrap_or_default();
    if headers.len() < MIN_COLUMNS {
        return Err(BridgeError::structural(
            &name,
            format!(
                "column header has {} columns, expected at least {MIN_COLUMNS}",
                headers.len()
            ),
        ));
    }

    let data: Vec<Vec<String>> = body.collect();
    let data_len = data.len() - FOOTER_ROWS;
    let width = headers.len();

    let mut records = Vec::with_capacity(data_len);
    for (i, mut fields) in data.into_iter().take(data_len).enumerate() {
        if fields.len() > width {
            return Err(BridgeError::structural(
                &name,
                format!(
                    "data row {} has {} fields, header has {width}",
                    METADATA_ROWS + 2 + i,
                    fields.len()
                ),
            ));
        }
        fields.resize(width, String::new());
        for cell in fields.iter_mut() {
            if is_missing(cell) {
                cell.clear();
            }
        }
        if PRESENCE_COLUMNS.iter().all(|&c| fields[c].is_empty()) {
            continue;
        }
        fields[DATE_COLUMN] = parse_date(&fields[DATE_COLUMN])
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        records.push(CanonicalRecord { fields });
    }

    tracing::debug!(
        file = %name,
        data_rows = data_len,
        kept = records.len(),
        "normalized export"
    );

    Ok(CanonicalTable {
        source: name,
        headers,
        rows: records,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const HEADERS: [&str; 23] = [
        "Company",
        "Project",
        "Donation Date",
        "Donor First Name",
        "Donor Last Name",
        "Email",
        "Address",
        "City",
        "State/Province",
        "Postal Code",
        "Activity",
        "Comment",
        "Transaction ID",
        "Donation Frequency",
        "Currency",
        "Project Remote ID",
        "Source",
        "Reason",
        "Total Donation to be Acknowledged",
        "Match Amount",
        "Cause Support Fee",
        "Merchant Fee",
        "Fee Comment",
    ];

    /// Build a Benevity-style export around the given data rows.
    pub(crate) fn export_csv(data_rows: &[&str]) -> Vec<u8> {
        let mut content = String::new();
        content.push_str("Donations Report,,\n");
        content.push_str("#-------------------------------------------,,\n");
        content.push_str("Charity Name,Example Food Bank\n");
        content.push_str("Charity ID,123456789\n");
        content.push_str("Period Ending,2025-03-31\n");
        content.push_str("Currency,USD\n");
        content.push_str("Payment Method,EFT\n");
        content.push_str("Disbursement ID,ABC123\n");
        content.push_str("Note,Donor information is confidential\n");
        content.push_str("#-------------------------------------------,,\n");
        content.push_str("Donation Details,,\n");
        content.push_str(&HEADERS.join(","));
        content.push('\n');
        for row in data_rows {
            content.push_str(row);
            content.push('\n');
        }
        content.push_str("Totals,,,,,,,,,,,,,,,,,,25.00,25.00,0.00,0.00,\n");
        content.push_str("Total Donations (Gross),50.00\n");
        content.push_str("Check Fee,0.00\n");
        content.push_str("Net Total Payment,50.00\n");
        content.into_bytes()
    }

    pub(crate) fn source(name: &str, data_rows: &[&str]) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            bytes: export_csv(data_rows),
        }
    }

    pub(crate) const FULL_ROW: &str = "Acme Corp,Hunger Relief,2025-03-05,Ada,Lovelace,ada@example.com,1 Main St,Springfield,IL,62701,Donation,,TX1,One-time,USD,,Payroll,,25.00,25.00,0.00,0.00,";
    pub(crate) const BLANK_ROW: &str = "Acme Corp,Hunger Relief,,,,,,,,,,,,,,,,,10.00,,,,";

    fn normalize_rows(data_rows: &[&str]) -> CanonicalTable {
        normalize(read_export(&source("test.csv", data_rows)).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_date_iso_and_us() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 5);
        assert_eq!(parse_date("2025-03-05"), expected);
        assert_eq!(parse_date("03/05/2025"), expected);
        assert_eq!(parse_date("3/5/2025"), expected);
        assert_eq!(parse_date("3/5/25"), expected);
        assert_eq!(parse_date("2025/03/05"), expected);
        assert_eq!(parse_date("  2025-03-05  "), expected);
    }

    #[test]
    fn test_parse_date_month_names_and_times() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 5);
        assert_eq!(parse_date("March 5, 2025"), expected);
        assert_eq!(parse_date("5 March 2025"), expected);
        assert_eq!(parse_date("05-Mar-2025"), expected);
        assert_eq!(parse_date("2025-03-05 14:30:00"), expected);
        assert_eq!(parse_date("2025-03-05T14:30:00"), expected);
        assert_eq!(parse_date("2025-03-05T14:30:00-05:00"), expected);
        assert_eq!(parse_date("3/5/2025 2:30 PM"), expected);
    }

    #[test]
    fn test_parse_date_two_digit_years_with_month_names() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 5);
        assert_eq!(parse_date("05-Mar-25"), expected);
        assert_eq!(parse_date("5 March 25"), expected);
        assert_eq!(parse_date("March 5, 25"), expected);
        assert_eq!(parse_date("Mar 5 25"), expected);
        assert_eq!(parse_date("5 Mar, 25"), expected);
    }

    #[test]
    fn test_parse_date_rejects_short_four_digit_years() {
        assert_eq!(parse_date("25-03-05"), None);
        assert_eq!(parse_date("3 March 5"), None);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("N/A"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("13/45/2025"), None);
        assert_eq!(parse_date("02/30/2025"), None);
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(""));
        assert!(is_missing("N/A"));
        assert!(is_missing("NaN"));
        assert!(is_missing("null"));
        assert!(!is_missing(" "));
        assert!(!is_missing("Ada"));
    }

    #[test]
    fn test_read_export_skips_blank_lines() {
        let file = SourceFile {
            name: "x.csv".to_string(),
            bytes: b"a,b\n\nc,d,e\n".to_vec(),
        };
        let raw = read_export(&file).unwrap();
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1], vec!["c", "d", "e"]);
    }

    #[test]
    fn test_normalize_drops_blank_donations() {
        let table = normalize_rows(&[FULL_ROW, BLANK_ROW]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.headers, HEADERS.to_vec());
        let row = &table.rows[0];
        assert_eq!(row.field(0), "Acme Corp");
        assert_eq!(row.field(2), "03/05/2025");
        assert_eq!(row.field(3), "Ada");
    }

    #[test]
    fn test_normalize_keeps_row_with_only_a_name() {
        let row = "Acme Corp,,,Grace,,,,,,,,,,,,,,,5.00,,,,";
        let table = normalize_rows(&[row]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].field(2), "");
    }

    #[test]
    fn test_normalize_unparseable_date_becomes_empty() {
        let row = "Acme Corp,,N/A,Grace,Hopper,,,,,,,,,,,,,,5.00,,,,";
        let table = normalize_rows(&[row]);
        assert_eq!(table.rows[0].field(2), "");
        let row = "Acme Corp,,sometime,Grace,Hopper,,,,,,,,,,,,,,5.00,,,,";
        let table = normalize_rows(&[row]);
        assert_eq!(table.rows[0].field(2), "");
    }

    #[test]
    fn test_normalize_missing_markers_count_as_empty() {
        let row = "Acme Corp,,N/A,NA,null,,,,,,,,,,,,,,5.00,,,,";
        let table = normalize_rows(&[row]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_normalize_pads_short_rows() {
        let table = normalize_rows(&["Acme Corp,,2025-01-02,Ada"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].fields.len(), HEADERS.len());
        assert_eq!(table.rows[0].field(19), "");
    }

    #[test]
    fn test_normalize_no_data_rows() {
        let table = normalize_rows(&[]);
        assert!(table.rows.is_empty());
        assert_eq!(table.headers.len(), HEADERS.len());
    }

    #[test]
    fn test_normalize_preserves_row_order() {
        let a = "A,,2025-01-01,Ann,One,,,,,,,,,,,,,,1,,,,";
        let b = "B,,2025-01-02,Bob,Two,,,,,,,,,,,,,,2,,,,";
        let c = "C,,2025-01-03,Cat,Three,,,,,,,,,,,,,,3,,,,";
        let table = normalize_rows(&[a, BLANK_ROW, b, c]);
        let companies: Vec<&str> = table.rows.iter().map(|r| r.field(0)).collect();
        assert_eq!(companies, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_normalize_rejects_short_file() {
        let file = SourceFile {
            name: "short.csv".to_string(),
            bytes: b"a,b,c,d,e\n1,2,3,4,5\n".to_vec(),
        };
        let err = normalize(read_export(&file).unwrap()).unwrap_err();
        assert!(matches!(err, BridgeError::Structural { ref file, .. } if file == "short.csv"));
    }

    #[test]
    fn test_normalize_rejects_narrow_header() {
        let mut content = String::new();
        for _ in 0..METADATA_ROWS {
            content.push_str("meta\n");
        }
        content.push_str("a,b,c\n");
        for _ in 0..FOOTER_ROWS {
            content.push_str("total\n");
        }
        let file = SourceFile {
            name: "narrow.csv".to_string(),
            bytes: content.into_bytes(),
        };
        let err = normalize(read_export(&file).unwrap()).unwrap_err();
        assert!(matches!(err, BridgeError::Structural { .. }));
    }

    #[test]
    fn test_normalize_rejects_overlong_row() {
        let row = format!("{FULL_ROW},extra,extra");
        let file = source("wide.csv", &[row.as_str()]);
        let err = normalize(read_export(&file).unwrap()).unwrap_err();
        assert!(err.to_string().contains("wide.csv"));
    }
}
