use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Failures that can occur while loading a source table. A load failure is
/// scoped to one source: the other source's pipeline is unaffected and the
/// operator can fix the file and retry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Wrapper for IO failures such as opening or reading the source file.
    #[error("failed to read '{source_name}': {cause}")]
    Io {
        source_name: String,
        #[source]
        cause: std::io::Error,
    },

    /// Raised when the delimited-text parser rejects the file.
    #[error("failed to parse '{source_name}': {cause}")]
    Delimited {
        source_name: String,
        #[source]
        cause: csv::Error,
    },

    /// Errors bubbled up from the Excel reader implementation.
    #[error("failed to read workbook '{source_name}': {cause}")]
    Excel {
        source_name: String,
        #[source]
        cause: calamine::XlsxError,
    },

    /// Raised when the requested sheet does not exist in the workbook.
    #[error("sheet '{sheet}' not found in '{source_name}'")]
    SheetNotFound { source_name: String, sheet: String },

    /// Raised when a source parses but contains no header row at all.
    #[error("'{source_name}' contains no rows to use as a header")]
    Empty { source_name: String },
}

/// Failures that can abort a reconciliation run. The loaded tables stay
/// valid afterwards, so the run can be retried with corrected selections.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Raised when a selected key or value column is absent from a table.
    /// Callers are expected to offer only existing columns, so hitting this
    /// indicates an integration bug rather than bad data.
    #[error("column '{column}' not found in {table}")]
    ColumnNotFound { table: String, column: String },

    /// Catch-all for unexpected failures during the join or diff step.
    #[error("reconciliation failed: {0}")]
    Internal(String),
}

/// Top-level error type for the command-line application.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A source table could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A reconciliation run failed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Wrapper for IO failures outside the loaders, e.g. writing the report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when writing or re-reading the delimited report fails.
    #[error("report error: {0}")]
    Report(#[from] csv::Error),

    /// Raised when JSON serialization of the summary fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a spreadsheet source needs a sheet selection first.
    #[error("'{0}' has multiple sheets; choose one with --sheet (see the `sheets` command)")]
    SheetRequired(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
