use serde::{Deserialize, Serialize};

/// Numeric tolerance below which two values are considered equal. The
/// comparison is strict (`< EPSILON`), so a difference of exactly this
/// magnitude still classifies as a match.
pub const EPSILON: f64 = 1e-8;

/// A single cell of a loaded table. Sources carry no declared schema, so a
/// cell is text, a number, or missing, decided per cell at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Plain text cell.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Empty or unreadable cell.
    Missing,
}

impl CellValue {
    /// Numeric view of the cell, used for value columns. Text that parses
    /// as a number counts; anything else is treated as missing so one bad
    /// cell never aborts a run.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(value) => value.trim().parse::<f64>().ok(),
            CellValue::Missing => None,
        }
    }

    /// Display rendering, preserving the original text of non-numeric cells.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(value) => value.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Missing => String::new(),
        }
    }

    /// Rendering used when the cell acts as a join key. Missing keys join
    /// under the empty string.
    pub fn key_string(&self) -> String {
        self.display()
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

/// A loaded table with named columns. Every row holds exactly one cell per
/// column; loaders pad short rows with [`CellValue::Missing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    /// Name shown in errors and logs, usually the source file name.
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl NormalizedTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the column count so the
    /// same-columns-per-record invariant holds.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    /// Position of a named column, if present.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// The first `limit` rows, for operator preview before column selection.
    pub fn preview(&self, limit: usize) -> &[Vec<CellValue>] {
        &self.rows[..self.rows.len().min(limit)]
    }
}

/// Ordered list of sheet names in a workbook, returned when a spreadsheet
/// source is opened without a sheet selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetManifest {
    pub sheets: Vec<String>,
}

/// Result of loading a source: either a ready table, or the manifest the
/// caller must pick a sheet from before data can be loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Table(NormalizedTable),
    Sheets(SheetManifest),
}

/// Match classification of one reconciled key.
///
/// A missing difference (key absent on one side, or a non-numeric value
/// cell) classifies as `Match`. This conflates "no counterpart" with
/// "values equal" but is preserved as-is: the exported status column is a
/// compatibility contract for downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Match,
    Mismatch,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Match => write!(f, "Match"),
            Status::Mismatch => write!(f, "Mismatch"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "Match" => Ok(Status::Match),
            "Mismatch" => Ok(Status::Mismatch),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// One row of the reconciliation report. Exactly one record exists per
/// joined row; the outer join never drops a key present in either source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconRecord {
    /// Unified key value, taken from whichever source supplied it.
    pub invoice_id: String,
    /// Value cell from the first source; missing when the key is absent
    /// there. The original cell is kept so non-numeric text still displays.
    pub value1: CellValue,
    /// Value cell from the second source.
    pub value2: CellValue,
    /// `value1 - value2`, or `None` when either side has no numeric value.
    pub difference: Option<f64>,
    pub status: Status,
}
