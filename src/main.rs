use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use invoice_recon::model::LoadOutcome;
use invoice_recon::report::ReportSummary;
use invoice_recon::session::{self, ColumnSelection};
use invoice_recon::{Result, ToolError, io};

fn main() {
    if let Err(error) = init_logging().and_then(|()| run(Cli::parse())) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sheets(args) => execute_sheets(args),
        Command::Columns(args) => execute_columns(args),
        Command::Reconcile(args) => execute_reconcile(args),
    }
}

fn execute_sheets(args: SheetsArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let manifest = io::excel_read::sheet_manifest(&args.input)?;
    for sheet in &manifest.sheets {
        println!("{sheet}");
    }
    Ok(())
}

fn execute_columns(args: ColumnsArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let table = match io::load(&args.input, args.sheet.as_deref())? {
        LoadOutcome::Table(table) => table,
        LoadOutcome::Sheets(_) => {
            return Err(ToolError::SheetRequired(io::source_name(&args.input)));
        }
    };

    println!("{}", table.columns.join("\t"));
    for row in table.preview(args.rows) {
        let cells: Vec<String> = row.iter().map(|cell| cell.display()).collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}

fn execute_reconcile(args: ReconcileArgs) -> Result<()> {
    for input in [&args.first, &args.second] {
        if !input.exists() {
            return Err(ToolError::MissingInput(input.clone()));
        }
    }

    let first_columns = ColumnSelection {
        key: args.first_key,
        value: args.first_value,
    };
    let second_columns = ColumnSelection {
        key: args.second_key,
        value: args.second_value,
    };

    let summary = session::reconcile_to_file(
        &args.first,
        args.first_sheet.as_deref(),
        &first_columns,
        &args.second,
        args.second_sheet.as_deref(),
        &second_columns,
        &args.output,
        args.mismatches_only,
    )?;

    print_summary(&summary, args.json)
}

fn print_summary(summary: &ReportSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("Matches:    {}", summary.match_count);
        println!("Mismatches: {}", summary.mismatch_count);
        println!("Total:      {}", summary.total_count);
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reconcile two invoice extracts by key and amount."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the sheets of a spreadsheet source.
    Sheets(SheetsArgs),
    /// Show the columns (and a few rows) of a source table.
    Columns(ColumnsArgs),
    /// Run a reconciliation and export the report.
    Reconcile(ReconcileArgs),
}

#[derive(clap::Args)]
struct SheetsArgs {
    /// Spreadsheet file path.
    #[arg(long)]
    input: PathBuf,
}

#[derive(clap::Args)]
struct ColumnsArgs {
    /// Source file path.
    #[arg(long)]
    input: PathBuf,

    /// Sheet name, required for spreadsheet sources.
    #[arg(long)]
    sheet: Option<String>,

    /// How many data rows to preview.
    #[arg(long, default_value_t = 5)]
    rows: usize,
}

#[derive(clap::Args)]
struct ReconcileArgs {
    /// First source file path.
    #[arg(long)]
    first: PathBuf,

    /// Sheet name for the first source, when it is a spreadsheet.
    #[arg(long)]
    first_sheet: Option<String>,

    /// Key column of the first source.
    #[arg(long)]
    first_key: String,

    /// Value column of the first source.
    #[arg(long)]
    first_value: String,

    /// Second source file path.
    #[arg(long)]
    second: PathBuf,

    /// Sheet name for the second source, when it is a spreadsheet.
    #[arg(long)]
    second_sheet: Option<String>,

    /// Key column of the second source.
    #[arg(long)]
    second_key: String,

    /// Value column of the second source.
    #[arg(long)]
    second_value: String,

    /// Where to write the delimited report.
    #[arg(long)]
    output: PathBuf,

    /// Export only mismatched rows.
    #[arg(long)]
    mismatches_only: bool,

    /// Print the summary as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}
