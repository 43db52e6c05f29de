use crate::error::{BridgeError, Result};
use crate::models::{CanonicalRecord, CanonicalTable, CombinedTable, TargetRecord};
use crate::normalizer::{parse_date, DATE_COLUMN, DATE_FORMAT};

/// Column header of the Bloomerang import file, in output order.
pub const TARGET_HEADERS: [&str; 10] = [
    "Account Number",
    "First Name",
    "Last Name",
    "Organization/Company Name",
    "Date",
    "Amount",
    "Fund",
    "Transaction Method",
    "CUSTOM: Email Freeform",
    "CUSTOM: Source",
];

pub const FUND: &str = "Unrestricted";
pub const TRANSACTION_METHOD: &str = "EFT";
pub const SOURCE: &str = "Benevity";

const COMPANY_COLUMN: usize = 0;
const FIRST_NAME_COLUMN: usize = 3;
const LAST_NAME_COLUMN: usize = 4;
const EMAIL_COLUMN: usize = 5;
/// Donor gift and employer match.
const AMOUNT_COLUMNS: [usize; 2] = [18, 19];
const MIN_COLUMNS: usize = 20;

/// Plain decimals only: optional sign, fraction and exponent, surrounding
/// whitespace allowed. Currency symbols, grouping and non-finite values are
/// not numbers.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    let value: f64 = s.parse().ok()?;
    value.is_finite().then_some(value)
}

// ---------------------------------------------------------------------------
// combine
// ---------------------------------------------------------------------------

/// Concatenate normalized exports in upload order. The first table's header
/// becomes the combined header.
pub fn combine(tables: Vec<CanonicalTable>) -> Result<CombinedTable> {
    let mut tables = tables.into_iter();
    let first = tables.next().ok_or(BridgeError::EmptyBatch)?;
    let width = first.headers.len();
    let mut combined = CombinedTable {
        headers: first.headers,
        rows: first.rows,
    };
    for table in tables {
        if table.headers.len() != width {
            return Err(BridgeError::structural(
                &table.source,
                format!(
                    "has {} columns but earlier exports have {width}",
                    table.headers.len()
                ),
            ));
        }
        if table.headers != combined.headers {
            return Err(BridgeError::structural(
                &table.source,
                "column names differ from earlier exports",
            ));
        }
        combined.rows.extend(table.rows);
    }
    Ok(combined)
}

// ---------------------------------------------------------------------------
// to_target
// ---------------------------------------------------------------------------

/// Derive one Bloomerang gift per combined row.
pub fn to_target(combined: &CombinedTable) -> Result<Vec<TargetRecord>> {
    if combined.headers.len() < MIN_COLUMNS {
        return Err(BridgeError::structural(
            "combined export",
            format!(
                "has {} columns, the amount columns need at least {MIN_COLUMNS}",
                combined.headers.len()
            ),
        ));
    }
    Ok(combined.rows.iter().map(map_record).collect())
}

fn map_record(row: &CanonicalRecord) -> TargetRecord {
    // Input is normally the normalizer's MM/DD/YYYY output, which must parse back.
    let date = parse_date(row.field(DATE_COLUMN))
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();
    let amount: f64 = AMOUNT_COLUMNS
        .iter()
        .map(|&c| parse_number(row.field(c)).unwrap_or(0.0))
        .sum();

    TargetRecord {
        account_number: String::new(),
        first_name: row.field(FIRST_NAME_COLUMN).to_string(),
        last_name: row.field(LAST_NAME_COLUMN).to_string(),
        organization: row.field(COMPANY_COLUMN).to_string(),
        date,
        amount,
        fund: FUND.to_string(),
        transaction_method: TRANSACTION_METHOD.to_string(),
        email: row.field(EMAIL_COLUMN).to_string(),
        source: SOURCE.to_string(),
    }
}
