use serde::Serialize;

use crate::model::{ReconRecord, Status};

/// Attribute attached to mismatched rows by the presentation layer.
pub const HIGHLIGHT_FLAG: &str = "flagged";

/// Aggregate counts over a reconciliation result. `total` always equals
/// `matches + mismatches`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub match_count: usize,
    pub mismatch_count: usize,
    pub total_count: usize,
}

impl ReportSummary {
    pub fn of(records: &[ReconRecord]) -> Self {
        let match_count = records
            .iter()
            .filter(|record| record.status == Status::Match)
            .count();
        Self {
            match_count,
            mismatch_count: records.len() - match_count,
            total_count: records.len(),
        }
    }
}

/// Non-mutating view of the records carrying the given status.
pub fn filter_status(records: &[ReconRecord], status: Status) -> Vec<&ReconRecord> {
    records
        .iter()
        .filter(|record| record.status == status)
        .collect()
}

/// Display attribute for one record: mismatches are flagged, matches carry
/// no attribute. Pure; used only by the presentation collaborator.
pub fn highlight(record: &ReconRecord) -> Option<&'static str> {
    match record.status {
        Status::Mismatch => Some(HIGHLIGHT_FLAG),
        Status::Match => None,
    }
}
