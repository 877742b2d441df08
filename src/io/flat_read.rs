use std::path::Path;

use csv::ReaderBuilder;

use crate::error::LoadError;
use crate::io::source_name;
use crate::model::{CellValue, NormalizedTable};

/// Reads a flat delimited file into a table, using its first row as the
/// column headers. No header detection is applied here; operators are
/// assumed to control this format directly.
pub fn read_table(path: &Path) -> Result<NormalizedTable, LoadError> {
    let name = source_name(path);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|cause| LoadError::Delimited {
            source_name: name.clone(),
            cause,
        })?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|cause| LoadError::Delimited {
            source_name: name.clone(),
            cause,
        })?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    if columns.is_empty() {
        return Err(LoadError::Empty { source_name: name });
    }

    let mut table = NormalizedTable::new(name.clone(), columns);
    for record in reader.records() {
        let record = record.map_err(|cause| LoadError::Delimited {
            source_name: name.clone(),
            cause,
        })?;
        table.push_row(record.iter().map(coerce_field).collect());
    }

    Ok(table)
}

/// Per-cell coercion for delimited text: empty fields are missing, fields
/// that parse as numbers become numeric, everything else stays text.
pub(crate) fn coerce_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => CellValue::Number(value),
        Err(_) => CellValue::Text(field.to_string()),
    }
}
