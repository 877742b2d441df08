use std::path::Path;

use crate::error::LoadError;
use crate::model::LoadOutcome;

pub mod excel_read;
pub mod flat_read;
pub mod report_write;

/// Loads a source table. Flat delimited files parse directly; spreadsheet
/// sources yield their sheet manifest until a sheet is chosen, then parse
/// that sheet with header auto-detection.
pub fn load(path: &Path, sheet: Option<&str>) -> Result<LoadOutcome, LoadError> {
    if is_spreadsheet(path) {
        match sheet {
            Some(name) => Ok(LoadOutcome::Table(excel_read::read_sheet(path, name)?)),
            None => Ok(LoadOutcome::Sheets(excel_read::sheet_manifest(path)?)),
        }
    } else {
        Ok(LoadOutcome::Table(flat_read::read_table(path)?))
    }
}

/// Format inference mirrors the upload flow: `.xlsx` is a spreadsheet,
/// everything else is treated as delimited text.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

/// Display name used in load errors, usually the file name.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
