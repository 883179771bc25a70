//! Sheet Cleaner Library
//!
//! Schema-agnostic cleaning and validation for tabular datasets, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! The library takes an arbitrary table (named columns, schema unknown in
//! advance) and returns a cleaned copy plus a report of everything it found
//! and changed:
//!
//! - **Profiling**: infers each column's type (integer, real, boolean, date,
//!   categorical, text) and coerces cells to it
//! - **Name standardization**: `"Customer ID"` becomes `customer_id`;
//!   collisions get `_2`, `_3`, ...
//! - **Deduplication**: drops rows repeating an earlier row's key values
//! - **Missing values**: median for numbers, mode for booleans, a placeholder
//!   for text; dates are reported, never invented
//! - **Validation report**: every issue and action, with summary counters,
//!   exportable as JSON or a polars table
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sheet_cleaner::{clean, CleaningConfig, Dataset};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! let config = CleaningConfig::builder()
//!     .dedup_key(["customer_id"])
//!     .build()?;
//!
//! let (cleaned, report) = clean(Dataset::from_dataframe(&df)?, &config)?;
//!
//! println!("{}", report.to_json_pretty()?);
//! let mut out = cleaned.to_dataframe()?;
//! ```
//!
//! # Progress Reporting
//!
//! ```rust,ignore
//! use sheet_cleaner::Pipeline;
//!
//! let output = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .clean(dataset)?;
//! ```
//!
//! # Errors
//!
//! Only configuration problems abort a run (see
//! [`CleaningError::is_configuration_error`]). Unparsable cells, empty
//! columns and name collisions are recorded in the report instead.

pub mod cleaner;
pub mod config;
pub mod error;
mod frame;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{
    Deduplicator, NameStandardizer, RequiredColumnCheck, find_column, standardize_name,
};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::MissingValueResolver;
pub use pipeline::{
    CleanOutput, CleaningStage, ClosureProgressReporter, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate, SheetOutcome,
};
pub use profiler::{ColumnProfile, ColumnProfiler};
pub use reporting::{
    IssueCategory, IssueKind, ReportSummary, Severity, ValidationIssue, ValidationReport,
    ValidationReporter,
};
pub use types::{Cell, Column, ColumnType, Dataset};

/// Clean a dataset with the given configuration.
///
/// Returns the cleaned dataset and its validation report, or a configuration
/// error. The function is pure: the same input and configuration always give
/// the same output.
pub fn clean(
    dataset: Dataset,
    config: &CleaningConfig,
) -> error::Result<(Dataset, ValidationReport)> {
    let output = Pipeline::builder().config(config.clone()).build()?.clean(dataset)?;
    Ok((output.dataset, output.report))
}
