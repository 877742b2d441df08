use std::path::Path;

use tracing::{info, instrument};

use crate::error::{ReconcileError, Result, ToolError};
use crate::io;
use crate::io::report_write;
use crate::model::{LoadOutcome, NormalizedTable, ReconRecord, Status};
use crate::recon;
use crate::report::ReportSummary;

/// Key and value column picked for one source table.
#[derive(Debug, Clone)]
pub struct ColumnSelection {
    pub key: String,
    pub value: String,
}

/// One operator session: two loaded tables plus the most recent result.
///
/// The result is a single slot, overwritten on every run trigger; no
/// history is retained. Tables are read-only once loaded, so a failed run
/// leaves them valid for a retry with corrected column selections.
#[derive(Debug, Default)]
pub struct ReconSession {
    first: Option<NormalizedTable>,
    second: Option<NormalizedTable>,
    last_result: Option<Vec<ReconRecord>>,
}

impl ReconSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the first source. A spreadsheet without a sheet selection
    /// yields its manifest and leaves the slot unfilled.
    pub fn load_first(&mut self, path: &Path, sheet: Option<&str>) -> Result<LoadOutcome> {
        let outcome = io::load(path, sheet)?;
        if let LoadOutcome::Table(table) = &outcome {
            self.first = Some(table.clone());
        }
        Ok(outcome)
    }

    /// Loads the second source, same contract as [`load_first`](Self::load_first).
    pub fn load_second(&mut self, path: &Path, sheet: Option<&str>) -> Result<LoadOutcome> {
        let outcome = io::load(path, sheet)?;
        if let LoadOutcome::Table(table) = &outcome {
            self.second = Some(table.clone());
        }
        Ok(outcome)
    }

    pub fn first(&self) -> Option<&NormalizedTable> {
        self.first.as_ref()
    }

    pub fn second(&self) -> Option<&NormalizedTable> {
        self.second.as_ref()
    }

    /// Runs a reconciliation over the loaded tables, overwriting the
    /// previous result.
    #[instrument(level = "info", skip_all)]
    pub fn run(
        &mut self,
        first_columns: &ColumnSelection,
        second_columns: &ColumnSelection,
    ) -> Result<&[ReconRecord]> {
        let first = self.first.as_ref().ok_or_else(|| {
            ReconcileError::Internal("run triggered before the first source was loaded".into())
        })?;
        let second = self.second.as_ref().ok_or_else(|| {
            ReconcileError::Internal("run triggered before the second source was loaded".into())
        })?;

        let records = recon::reconcile(
            first,
            &first_columns.key,
            &first_columns.value,
            second,
            &second_columns.key,
            &second_columns.value,
        )?;
        info!(record_count = records.len(), "reconciliation complete");

        self.last_result = Some(records);
        Ok(self.last_result.as_deref().unwrap_or_default())
    }

    pub fn last_result(&self) -> Option<&[ReconRecord]> {
        self.last_result.as_deref()
    }
}

/// End-to-end run for the command line: load both sources, reconcile, and
/// export the report as delimited text.
#[instrument(
    level = "info",
    skip_all,
    fields(first = %first.display(), second = %second.display(), output = %output.display())
)]
#[allow(clippy::too_many_arguments)]
pub fn reconcile_to_file(
    first: &Path,
    first_sheet: Option<&str>,
    first_columns: &ColumnSelection,
    second: &Path,
    second_sheet: Option<&str>,
    second_columns: &ColumnSelection,
    output: &Path,
    mismatches_only: bool,
) -> Result<ReportSummary> {
    let mut session = ReconSession::new();

    require_table(session.load_first(first, first_sheet)?, first)?;
    require_table(session.load_second(second, second_sheet)?, second)?;

    let records = session.run(first_columns, second_columns)?.to_vec();
    let summary = ReportSummary::of(&records);

    let exported: Vec<ReconRecord> = if mismatches_only {
        records
            .into_iter()
            .filter(|record| record.status == Status::Mismatch)
            .collect()
    } else {
        records
    };
    report_write::write_report(output, &exported)?;
    info!(
        exported = exported.len(),
        matches = summary.match_count,
        mismatches = summary.mismatch_count,
        "report written"
    );

    Ok(summary)
}

fn require_table(outcome: LoadOutcome, path: &Path) -> Result<()> {
    match outcome {
        LoadOutcome::Table(_) => Ok(()),
        LoadOutcome::Sheets(_) => Err(ToolError::SheetRequired(io::source_name(path))),
    }
}
