// src/main.rs
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chart_extract::extractors::specs::canonical_names;
use chart_extract::extractors::{AssemblerConfig, BlockTermination, RecordAssembler};
use chart_extract::record::Record;
use chart_extract::pipeline::process_documents;
use chart_extract::storage::{write_csv, StorageManager};
use chart_extract::utils::error::RecordError;
use chart_extract::utils::{self, AppError};
use chart_extract::view::RecordView;
use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Hide/Field/Value table of every field
    Table,
    /// One "field: value" line per non-empty field
    Summary,
    /// Visible rows as CSV
    Csv,
    /// The full record as a JSON object
    Json,
}

/// Command Line Interface for clinical field extraction
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Documents to extract from (.pdf or plain text)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format written to stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write CSV, summary and JSON metadata for each document here
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Hide a field from CSV export (repeatable)
    #[arg(long = "hide", value_name = "FIELD")]
    hidden: Vec<String>,

    /// Only show table rows whose field or value contains this text
    #[arg(long, value_name = "TERM")]
    filter: Option<String>,

    /// Overwrite a field after extraction, as FIELD=VALUE (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    overrides: Vec<String>,

    /// End block excerpts at the next recognized section header
    #[arg(long)]
    stop_at_next_header: bool,
}

impl Args {
    fn assembler_config(&self) -> AssemblerConfig {
        let termination = if self.stop_at_next_header {
            BlockTermination::NextHeader
        } else {
            BlockTermination::Window
        };
        AssemblerConfig { termination }
    }

    /// Rejects `--set` and `--hide` values that name no canonical field,
    /// before any document is processed.
    fn check_field_options(&self) -> Result<(), RecordError> {
        let mut scratch = RecordView::new(Record::empty(canonical_names()));
        for assignment in &self.overrides {
            scratch.apply_assignment(assignment)?;
        }
        for field in &self.hidden {
            scratch.hide(field)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Validate field options and compile the field table
    args.check_field_options()?;
    let assembler = Arc::new(RecordAssembler::new(args.assembler_config())?);

    // 4. Initialize storage if requested
    let mut storage = args.output_dir.as_ref().map(StorageManager::new).transpose()?;

    // 5. Load and extract every document
    let outcomes = process_documents(args.files.clone(), Arc::clone(&assembler)).await;
    let termination = assembler.config().termination;
    let multiple = outcomes.len() > 1;

    let mut success_count = 0;
    let mut failure_count = 0;

    for outcome in outcomes {
        let record = match outcome.result {
            Ok(record) => record,
            Err(_) => {
                // Already logged by the pipeline
                failure_count += 1;
                continue;
            }
        };
        success_count += 1;

        // 6. Apply edits and hide flags
        let mut view = RecordView::new(record);
        for assignment in &args.overrides {
            view.apply_assignment(assignment)?;
        }
        for field in &args.hidden {
            view.hide(field)?;
        }

        // 7. Write output
        if multiple {
            println!("== {} ==", outcome.path.display());
        }
        match args.format {
            OutputFormat::Table => print!("{}", view.render_table(args.filter.as_deref().unwrap_or(""))),
            OutputFormat::Summary => print!("{}", view.record().to_summary_text()),
            OutputFormat::Csv => write_csv(io::stdout().lock(), view.visible_rows())?,
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(view.record())
                    .map_err(|e| AppError::Processing(e.to_string()))?;
                println!("{}", json);
            }
        }

        if let Some(storage) = storage.as_mut() {
            storage.save_document(&outcome.path, &view, termination)?;
        }
    }

    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("Failed to load any of {} documents", failure_count)));
    }

    Ok(())
}
