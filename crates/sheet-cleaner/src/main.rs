//! CLI entry point for the sheet cleaner.

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::Parser;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use sheet_cleaner::{
    CleanOutput, CleaningConfig, ColumnProfile, Dataset, Pipeline, ValidationReport,
};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Schema-agnostic cleaning and validation for tabular data",
    long_about = "Cleans an arbitrary CSV table: infers column types, standardizes names,\n\
                  removes duplicate rows, fills missing values, and writes a validation\n\
                  report of every issue found and action taken.\n\n\
                  EXAMPLES:\n  \
                  # Clean with defaults (duplicates across all columns)\n  \
                  sheet-cleaner -i customers.csv\n\n  \
                  # Deduplicate on a key and require some columns\n  \
                  sheet-cleaner -i customers.csv --key customer_id --required email\n\n  \
                  # Preview inferred column types without writing anything\n  \
                  sheet-cleaner -i customers.csv --dry-run\n\n  \
                  # Machine-readable output\n  \
                  sheet-cleaner -i customers.csv --json | jq .report.summary"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// JSON file with a cleaning configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column compared when detecting duplicates (repeatable; default: all columns)
    #[arg(long = "key")]
    key: Vec<String>,

    /// Column that must be present and complete (repeatable)
    #[arg(long = "required")]
    required: Vec<String>,

    /// Maximum distinct values for a categorical column (default: min(20, rows/2))
    #[arg(long)]
    cardinality_threshold: Option<usize>,

    /// Accepted date format, chrono strftime syntax (repeatable; replaces defaults)
    #[arg(long = "date-format")]
    date_format: Vec<String>,

    /// Missing dates per column reported individually before summarizing
    #[arg(long)]
    date_report_cap: Option<usize>,

    /// Share of non-missing cells that must agree on a type (0.0 - 1.0]
    #[arg(long)]
    type_agreement: Option<f64>,

    /// Placeholder for missing text and categorical cells
    #[arg(long)]
    placeholder: Option<String>,

    /// Trim surrounding whitespace from text cells
    #[arg(long)]
    trim_text: bool,

    /// Treat blank text cells as missing
    #[arg(long)]
    blank_as_missing: bool,

    /// Keep duplicate rows
    #[arg(long)]
    no_dedup: bool,

    /// Preview inferred column types without cleaning
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only the final JSON is written to stdout.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Everything printed by `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: String,
    input_file: &'a str,
    cleaned_file: String,
    report_file: String,
    profiles: &'a [ColumnProfile],
    report: &'a ValidationReport,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;

    info!("Loading dataset from: {}", args.input);
    let df = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", df.shape());
    let dataset = Dataset::from_dataframe(&df)?;

    let pipeline = build_pipeline(&args, config)?;

    if args.dry_run {
        run_dry_run(&args, &pipeline, &dataset);
        return Ok(());
    }

    if !Path::new(&args.output).exists() {
        fs::create_dir_all(&args.output)?;
        info!("Created output directory: {}", args.output);
    }

    run_pipeline(&pipeline, &args, dataset)
}

/// Load the configuration file if given, then apply flag overrides.
fn build_config(args: &Args) -> Result<CleaningConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<CleaningConfig>(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => CleaningConfig::default(),
    };

    if !args.key.is_empty() {
        config.dedup_key = Some(args.key.clone());
    }
    if !args.required.is_empty() {
        config.required_columns = args.required.clone();
    }
    if let Some(threshold) = args.cardinality_threshold {
        config.cardinality_threshold = Some(threshold);
    }
    if !args.date_format.is_empty() {
        config.date_formats = args.date_format.clone();
    }
    if let Some(cap) = args.date_report_cap {
        config.missing_date_report_cap = cap;
    }
    if let Some(agreement) = args.type_agreement {
        config.type_agreement = agreement;
    }
    if let Some(placeholder) = &args.placeholder {
        config.fill_placeholder = placeholder.clone();
    }
    if args.trim_text {
        config.trim_text = true;
    }
    if args.blank_as_missing {
        config.blank_as_missing = true;
    }
    if args.no_dedup {
        config.remove_duplicates = false;
    }

    config.validate()?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn build_pipeline(args: &Args, config: CleaningConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Show inferred column types without cleaning.
///
/// Uses `println!` for user-facing output, independent of log level.
fn run_dry_run(args: &Args, pipeline: &Pipeline, dataset: &Dataset) {
    let profiles = pipeline.profile(dataset);

    if args.json {
        match serde_json::to_string_pretty(&profiles) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Failed to serialize profiles: {}", e),
        }
        return;
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of inferred column types");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", dataset.height());
    println!("  Columns: {}", dataset.width());
    println!();

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<24} {:<12} {:<10} {:<10} {:<30}",
        "Column", "Type", "Missing %", "Distinct", "Samples"
    );
    println!("{}", "-".repeat(86));

    for profile in &profiles {
        println!(
            "{:<24} {:<12} {:<10.1} {:<10} {:<30}",
            truncate_str(&profile.name, 23),
            profile.inferred_type,
            profile.missing_percentage,
            profile.distinct,
            truncate_str(&profile.sample_values.join(", "), 30)
        );
    }
    println!();

    let stem = extract_file_stem(&args.input);
    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    println!("  - {}/{}_cleaned.csv", args.output, stem);
    println!("  - {}/{}_report.json", args.output, stem);
    println!("  - {}/{}_report.csv", args.output, stem);
    println!();
    println!("{}", "=".repeat(80));
    println!("To clean the dataset, run without --dry-run");
    println!("{}", "=".repeat(80));
}

/// Run the pipeline, write outputs and print results.
fn run_pipeline(pipeline: &Pipeline, args: &Args, dataset: Dataset) -> Result<()> {
    let output = match pipeline.clean(dataset) {
        Ok(output) => output,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": &e }))?);
            }
            error!("Cleaning failed: {}", e);
            return Err(anyhow!("Cleaning failed: {}", e));
        }
    };

    let stem = extract_file_stem(&args.input);
    let output_dir = PathBuf::from(&args.output);
    let cleaned_path = output_dir.join(format!("{stem}_cleaned.csv"));
    let report_json_path = output_dir.join(format!("{stem}_report.json"));
    let report_csv_path = output_dir.join(format!("{stem}_report.csv"));

    write_csv(&mut output.dataset.to_dataframe()?, &cleaned_path)?;
    fs::write(&report_json_path, output.report.to_json_pretty()?)?;
    write_csv(&mut output.report.to_dataframe()?, &report_csv_path)?;
    info!("Cleaned dataset written to: {}", cleaned_path.display());
    info!("Report written to: {}", report_json_path.display());

    if args.json {
        let json = JsonOutput {
            generated_at: Local::now().to_rfc3339(),
            input_file: &args.input,
            cleaned_file: cleaned_path.display().to_string(),
            report_file: report_json_path.display().to_string(),
            profiles: &output.profiles,
            report: &output.report,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    print_human_readable_summary(&output, args, &cleaned_path);
    Ok(())
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length (in characters) with ellipsis.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a human-readable summary of the cleaning results.
fn print_human_readable_summary(output: &CleanOutput, args: &Args, cleaned_path: &Path) {
    let summary = &output.report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, summary.rows_before, summary.columns
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        cleaned_path.display(),
        summary.rows_after,
        summary.columns
    );
    println!();

    println!("Summary:");
    println!("  Duplicate rows removed: {}", summary.duplicates_removed());
    println!("  Columns renamed: {}", summary.columns_renamed());
    println!("  Cells filled: {}", summary.cells_filled());
    for (column, count) in &summary.cells_filled_by_column {
        println!("    {column}: {count}");
    }
    println!();

    let warnings: Vec<_> = output.report.warnings().collect();
    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in warnings.iter().take(10) {
            println!("  ! {}", warning);
        }
        if warnings.len() > 10 {
            println!("  ... and {} more warnings", warnings.len() - 10);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Load CSV with fallback strategies.
///
/// Every column is read as text so type inference happens in the profiler.
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            warn!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .with_context(|| format!("Could not read {path} as CSV"))
}
