use std::fs;
use std::path::Path;

use invoice_recon::io;
use invoice_recon::model::{CellValue, LoadOutcome, NormalizedTable};
use invoice_recon::session::{self, ColumnSelection, ReconSession};
use invoice_recon::{LoadError, ToolError};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

fn load_table(path: &Path, sheet: Option<&str>) -> NormalizedTable {
    match io::load(path, sheet).expect("source loaded") {
        LoadOutcome::Table(table) => table,
        LoadOutcome::Sheets(manifest) => panic!("expected a table, got sheets {:?}", manifest),
    }
}

fn columns(key: &str, value: &str) -> ColumnSelection {
    ColumnSelection {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn flat_file_uses_its_first_row_as_header() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("ledger.csv");
    fs::write(&path, "Invoice,Amount,Note\nK1,10.5,paid\nK2,,\n").expect("fixture written");

    let table = load_table(&path, None);
    assert_eq!(table.columns, vec!["Invoice", "Amount", "Note"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], CellValue::Text("K1".to_string()));
    assert_eq!(table.rows[0][1], CellValue::Number(10.5));
    assert_eq!(table.rows[1][1], CellValue::Missing);
    assert_eq!(table.rows[1][2], CellValue::Missing);
}

#[test]
fn spreadsheet_without_sheet_choice_yields_the_manifest() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("book.xlsx");

    let mut workbook = Workbook::new();
    workbook
        .add_worksheet()
        .set_name("January")
        .expect("sheet named");
    workbook
        .add_worksheet()
        .set_name("February")
        .expect("sheet named");
    workbook.save(&path).expect("workbook saved");

    match io::load(&path, None).expect("manifest loaded") {
        LoadOutcome::Sheets(manifest) => {
            assert_eq!(manifest.sheets, vec!["January", "February"]);
        }
        LoadOutcome::Table(_) => panic!("expected the sheet manifest"),
    }
}

#[test]
fn header_is_located_below_banner_and_blank_rows() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("export.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Data").expect("sheet named");
    worksheet
        .write_string(0, 0, "Report Title")
        .expect("banner written");
    // Row 1 left entirely blank.
    worksheet.write_string(2, 0, "ID").expect("header written");
    worksheet.write_string(2, 1, "Amount").expect("header written");
    worksheet.write_string(3, 0, "1").expect("cell written");
    worksheet.write_number(3, 1, 100.0).expect("cell written");
    workbook.save(&path).expect("workbook saved");

    let table = load_table(&path, Some("Data"));
    assert_eq!(table.columns, vec!["ID", "Amount"]);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][0], CellValue::Text("1".to_string()));
    assert_eq!(table.rows[0][1], CellValue::Number(100.0));
}

#[test]
fn header_detection_falls_back_to_the_first_row() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("narrow.xlsx");

    // No row has two text cells, so nothing qualifies as a header.
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Data").expect("sheet named");
    worksheet.write_string(0, 0, "Invoice").expect("cell written");
    worksheet.write_number(0, 1, 1.0).expect("cell written");
    worksheet.write_string(1, 0, "K1").expect("cell written");
    worksheet.write_number(1, 1, 10.0).expect("cell written");
    workbook.save(&path).expect("workbook saved");

    let table = load_table(&path, Some("Data"));
    assert_eq!(table.columns, vec!["Invoice", "1"]);
    assert_eq!(table.rows.len(), 1);
}

#[test]
fn missing_sheet_is_a_load_error() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("book.xlsx");

    let mut workbook = Workbook::new();
    workbook
        .add_worksheet()
        .set_name("Only")
        .expect("sheet named");
    workbook.save(&path).expect("workbook saved");

    let error = io::load(&path, Some("Nope")).expect_err("missing sheet");
    match error {
        LoadError::SheetNotFound { sheet, .. } => assert_eq!(sheet, "Nope"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_file_is_a_load_error() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("absent.csv");

    assert!(io::load(&path, None).is_err());
}

#[test]
fn session_runs_end_to_end_and_overwrites_its_result() {
    let temp_dir = tempdir().expect("temporary directory");
    let first = temp_dir.path().join("a.csv");
    let second = temp_dir.path().join("b.csv");
    fs::write(&first, "Invoice,Amount\nK1,10\nK2,20\n").expect("fixture written");
    fs::write(&second, "Invoice,Amount\nK1,10\nK2,25\n").expect("fixture written");

    let mut session = ReconSession::new();
    session.load_first(&first, None).expect("first loaded");
    session.load_second(&second, None).expect("second loaded");
    assert!(session.last_result().is_none());

    let selection = columns("Invoice", "Amount");
    let records = session.run(&selection, &selection).expect("run").to_vec();
    assert_eq!(records.len(), 2);

    // A second trigger replaces the previous result rather than appending.
    session.run(&selection, &selection).expect("rerun");
    assert_eq!(session.last_result().map(|records| records.len()), Some(2));
}

#[test]
fn reconcile_to_file_writes_the_report_and_summary() {
    let temp_dir = tempdir().expect("temporary directory");
    let first = temp_dir.path().join("a.csv");
    let second = temp_dir.path().join("b.xlsx");
    let output = temp_dir.path().join("reconciliation.csv");

    fs::write(&first, "Invoice,Amount\nK1,10\nK2,20\n").expect("fixture written");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Ledger").expect("sheet named");
    worksheet.write_string(0, 0, "Invoice").expect("cell written");
    worksheet.write_string(0, 1, "Amount").expect("cell written");
    worksheet.write_string(1, 0, "K1").expect("cell written");
    worksheet.write_number(1, 1, 10.0).expect("cell written");
    worksheet.write_string(2, 0, "K2").expect("cell written");
    worksheet.write_number(2, 1, 25.0).expect("cell written");
    workbook.save(&second).expect("workbook saved");

    let summary = session::reconcile_to_file(
        &first,
        None,
        &columns("Invoice", "Amount"),
        &second,
        Some("Ledger"),
        &columns("Invoice", "Amount"),
        &output,
        false,
    )
    .expect("reconciliation run");

    assert_eq!(summary.match_count, 1);
    assert_eq!(summary.mismatch_count, 1);
    assert_eq!(summary.total_count, 2);

    let report = fs::read_to_string(&output).expect("report read");
    let mut lines = report.lines();
    assert_eq!(
        lines.next(),
        Some("InvoiceID,Value1,Value2,Difference,Status")
    );
    assert_eq!(lines.clone().count(), 2);
    assert!(lines.any(|line| line.ends_with("Mismatch")));
}

#[test]
fn mismatch_only_export_filters_but_counts_everything() {
    let temp_dir = tempdir().expect("temporary directory");
    let first = temp_dir.path().join("a.csv");
    let second = temp_dir.path().join("b.csv");
    let output = temp_dir.path().join("mismatches.csv");

    fs::write(&first, "Invoice,Amount\nK1,10\nK2,20\n").expect("fixture written");
    fs::write(&second, "Invoice,Amount\nK1,10\nK2,25\n").expect("fixture written");

    let selection = columns("Invoice", "Amount");
    let summary = session::reconcile_to_file(
        &first, None, &selection, &second, None, &selection, &output, true,
    )
    .expect("reconciliation run");

    // The summary covers the full result even when the export is filtered.
    assert_eq!(summary.total_count, 2);

    let report = fs::read_to_string(&output).expect("report read");
    let data_lines: Vec<&str> = report.lines().skip(1).collect();
    assert_eq!(data_lines.len(), 1);
    assert!(data_lines[0].starts_with("K2"));
    assert_eq!(data_lines[0].split(',').last(), Some("Mismatch"));
}

#[test]
fn spreadsheet_run_without_sheet_choice_is_rejected() {
    let temp_dir = tempdir().expect("temporary directory");
    let first = temp_dir.path().join("a.xlsx");
    let second = temp_dir.path().join("b.csv");
    let output = temp_dir.path().join("out.csv");

    let mut workbook = Workbook::new();
    workbook
        .add_worksheet()
        .set_name("Ledger")
        .expect("sheet named");
    workbook.save(&first).expect("workbook saved");
    fs::write(&second, "Invoice,Amount\nK1,10\n").expect("fixture written");

    let selection = columns("Invoice", "Amount");
    let error = session::reconcile_to_file(
        &first, None, &selection, &second, None, &selection, &output, false,
    )
    .expect_err("sheet selection required");
    assert!(matches!(error, ToolError::SheetRequired(_)));
}
