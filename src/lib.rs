//! Core library for the invoice-recon command line application.
//!
//! The library exposes the reconciliation pipeline that powers the
//! command-line interface as well as the integration tests. The modules are
//! structured to keep responsibilities narrow and composable: source loaders
//! live under [`io`], the table and record shapes inside [`model`], the
//! outer-join diff in [`recon`], aggregate views in [`report`], and the run
//! orchestration under [`session`].

pub mod error;
pub mod io;
pub mod model;
pub mod recon;
pub mod report;
pub mod session;

pub use error::{LoadError, ReconcileError, Result, ToolError};
pub use model::{
    CellValue, EPSILON, LoadOutcome, NormalizedTable, ReconRecord, SheetManifest, Status,
};
pub use report::ReportSummary;
pub use session::{ColumnSelection, ReconSession};
