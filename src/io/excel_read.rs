use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::LoadError;
use crate::io::source_name;
use crate::model::{CellValue, NormalizedTable, SheetManifest};

/// How many leading rows are scanned when locating the header row.
pub const HEADER_SCAN_LIMIT: usize = 20;

/// Lists the sheets of a workbook in order, for the operator to pick from.
pub fn sheet_manifest(path: &Path) -> Result<SheetManifest, LoadError> {
    let workbook = open_xlsx(path)?;
    Ok(SheetManifest {
        sheets: workbook.sheet_names().to_vec(),
    })
}

/// Reads one sheet of a workbook into a table. The sheet is scanned
/// headerless first to locate the real header row, which skips banner
/// rows, titles, and blank separators that exports often carry above the
/// actual column labels.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<NormalizedTable, LoadError> {
    let name = source_name(path);
    let mut workbook = open_xlsx(path)?;

    let range_result =
        workbook
            .worksheet_range(sheet)
            .ok_or_else(|| LoadError::SheetNotFound {
                source_name: name.clone(),
                sheet: sheet.to_string(),
            })?;
    let range = range_result.map_err(|cause| LoadError::Excel {
        source_name: name.clone(),
        cause,
    })?;

    let header_index = locate_header(&range, HEADER_SCAN_LIMIT);
    let header_row = range
        .rows()
        .nth(header_index)
        .ok_or_else(|| LoadError::Empty {
            source_name: name.clone(),
        })?;

    let columns = header_labels(header_row);
    let mut table = NormalizedTable::new(name, columns);
    for row in range.rows().skip(header_index + 1) {
        table.push_row(row.iter().map(cell_value).collect());
    }

    Ok(table)
}

/// Finds the index of the first row that plausibly holds column labels: at
/// least two non-missing cells, none of them numeric. Scans at most
/// `scan_limit` rows and falls back to 0 when nothing qualifies, so header
/// detection never fails a load on its own.
pub fn locate_header(range: &Range<DataType>, scan_limit: usize) -> usize {
    for (index, row) in range.rows().take(scan_limit).enumerate() {
        let filled = row.iter().filter(|cell| !cell_is_missing(cell)).count();
        let all_textual = row
            .iter()
            .all(|cell| cell_is_missing(cell) || matches!(cell, DataType::String(_)));
        if filled >= 2 && all_textual {
            return index;
        }
    }
    0
}

fn open_xlsx(path: &Path) -> Result<Xlsx<std::io::BufReader<std::fs::File>>, LoadError> {
    open_workbook(path).map_err(|cause| LoadError::Excel {
        source_name: source_name(path),
        cause,
    })
}

fn cell_is_missing(cell: &DataType) -> bool {
    matches!(cell, DataType::Empty | DataType::Error(_))
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Text(value.to_string()),
        DataType::Empty | DataType::Error(_) => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

/// Builds column names from the header row. Blank header cells get a
/// positional name and duplicates get a numeric suffix so column names
/// stay unique within the table.
fn header_labels(row: &[DataType]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(row.len());
    for (index, cell) in row.iter().enumerate() {
        let text = cell_value(cell).display();
        let trimmed = text.trim();
        let base = if trimmed.is_empty() {
            format!("Column{}", index + 1)
        } else {
            trimmed.to_string()
        };

        let mut label = base.clone();
        let mut counter = 1;
        while labels.contains(&label) {
            label = format!("{base}_{counter}");
            counter += 1;
        }
        labels.push(label);
    }
    labels
}
