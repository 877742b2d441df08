use std::path::Path;

use csv::{Reader, Writer};

use crate::error::{Result, ToolError};
use crate::io::flat_read::coerce_field;
use crate::model::{CellValue, ReconRecord, Status};

/// Column order of the exported report. This exact set and order is a
/// compatibility contract for downstream consumers; do not reorder.
pub const REPORT_COLUMNS: [&str; 5] = ["InvoiceID", "Value1", "Value2", "Difference", "Status"];

/// Writes the reconciliation report as UTF-8 delimited text.
pub fn write_report(path: &Path, records: &[ReconRecord]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    write_rows(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Renders the report to an in-memory string, used for stdout previews.
pub fn render_report(records: &[ReconRecord]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    write_rows(&mut writer, records)?;
    let bytes = writer
        .into_inner()
        .map_err(|error| ToolError::Io(std::io::Error::other(error.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|error| ToolError::Io(std::io::Error::other(error.to_string())))
}

/// Re-imports an exported report with numeric coercion. Used to verify the
/// export round-trips and to let downstream tooling consume past reports.
pub fn read_report(path: &Path) -> Result<Vec<ReconRecord>> {
    let mut reader = Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let field = |index: usize| row.get(index).unwrap_or_default();

        let difference = {
            let text = field(3).trim();
            if text.is_empty() {
                None
            } else {
                text.parse::<f64>().ok()
            }
        };
        let status = field(4)
            .parse::<Status>()
            .map_err(|error| ToolError::Io(std::io::Error::other(error)))?;

        records.push(ReconRecord {
            invoice_id: field(0).to_string(),
            value1: coerce_field(field(1)),
            value2: coerce_field(field(2)),
            difference,
            status,
        });
    }

    Ok(records)
}

fn write_rows<W: std::io::Write>(writer: &mut Writer<W>, records: &[ReconRecord]) -> Result<()> {
    writer.write_record(REPORT_COLUMNS)?;
    for record in records {
        writer.write_record([
            record.invoice_id.clone(),
            cell_field(&record.value1),
            cell_field(&record.value2),
            record
                .difference
                .map(|value| value.to_string())
                .unwrap_or_default(),
            record.status.to_string(),
        ])?;
    }
    Ok(())
}

fn cell_field(cell: &CellValue) -> String {
    cell.display()
}
