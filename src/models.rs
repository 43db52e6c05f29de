/// One uploaded export as handed over by the CLI boundary.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Every non-blank row of a raw export, including metadata and footer rows.
#[derive(Debug, Clone)]
pub struct RawExport {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// A data row padded to the width of its table's header.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub fields: Vec<String>,
}

impl CanonicalRecord {
    /// Cell at `idx`, empty when the row is narrower than `idx`.
    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// The normalized rows of a single export.
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<CanonicalRecord>,
}

/// All canonical tables of a batch, concatenated in upload order.
#[derive(Debug, Clone, Default)]
pub struct CombinedTable {
    pub headers: Vec<String>,
    pub rows: Vec<CanonicalRecord>,
}

/// One gift in the Bloomerang import layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    pub account_number: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub date: String,
    pub amount: f64,
    pub fund: String,
    pub transaction_method: String,
    pub email: String,
    pub source: String,
}
