//! Column profiling.
//!
//! The profiler inspects every column, infers its [`ColumnType`] and coerces
//! the cells to that type's representation. It runs first in the pipeline, so
//! row indices it reports are the caller's original indices.
//!
//! Optional pre-passes (whitespace trimming, blank-as-missing) run before
//! inference when enabled in [`CleaningConfig`].

mod type_inference;

use crate::config::CleaningConfig;
use crate::reporting::{IssueKind, ValidationIssue, ValidationReporter};
use crate::types::{Cell, Column, ColumnType, Dataset};
use crate::utils::percentage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use type_inference::{coerce_cell, distinct_count, infer_column_type};

/// Number of sample values kept per profile.
const SAMPLE_SIZE: usize = 5;

/// Summary of one column after profiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnType,
    pub non_missing: usize,
    pub missing: usize,
    pub missing_percentage: f64,
    pub distinct: usize,
    /// Cells that did not parse as the inferred type and became missing.
    pub unparsable: usize,
    /// First few distinct non-missing values, rendered as text.
    pub sample_values: Vec<String>,
}

/// Infers column types and coerces cells.
pub struct ColumnProfiler<'a> {
    config: &'a CleaningConfig,
}

impl<'a> ColumnProfiler<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self { config }
    }

    /// Profile every column in place, recording issues into `reporter`.
    pub fn profile(
        &self,
        dataset: &mut Dataset,
        reporter: &mut ValidationReporter,
    ) -> Vec<ColumnProfile> {
        let threshold = self.config.effective_cardinality_threshold(dataset.height());
        info!(
            "Profiling {} columns (cardinality threshold {})",
            dataset.width(),
            threshold
        );

        dataset
            .columns_mut()
            .iter_mut()
            .map(|column| self.profile_column(column, threshold, reporter))
            .collect()
    }

    /// Profile a copy of the dataset, leaving the input and any report untouched.
    pub fn preview(&self, dataset: &Dataset) -> Vec<ColumnProfile> {
        let mut copy = dataset.clone();
        let mut scratch = ValidationReporter::new();
        self.profile(&mut copy, &mut scratch)
    }

    fn profile_column(
        &self,
        column: &mut Column,
        threshold: usize,
        reporter: &mut ValidationReporter,
    ) -> ColumnProfile {
        if self.config.trim_text {
            trim_text_cells(column, reporter);
        }
        if self.config.blank_as_missing {
            blank_text_to_missing(column, reporter);
        }

        let inferred = infer_column_type(
            &column.values,
            &self.config.date_formats,
            self.config.type_agreement,
            threshold,
        );
        column.column_type = inferred;
        debug!("Column '{}' inferred as {}", column.name, inferred);

        if inferred == ColumnType::Unknown {
            reporter.record(
                ValidationIssue::new(IssueKind::EmptyColumn, "entire column empty")
                    .in_column(&column.name),
            );
        }
        reporter.record(
            ValidationIssue::new(IssueKind::TypeInferred, format!("inferred type {inferred}"))
                .in_column(&column.name),
        );

        let unparsable = self.coerce_column(column, reporter);
        build_profile(column, unparsable)
    }

    /// Coerce every cell; cells that don't parse become missing.
    fn coerce_column(&self, column: &mut Column, reporter: &mut ValidationReporter) -> usize {
        let column_type = column.column_type;
        let mut unparsable = 0;

        for (row, cell) in column.values.iter_mut().enumerate() {
            match coerce_cell(cell, column_type, &self.config.date_formats) {
                Some(coerced) => *cell = coerced,
                None => {
                    unparsable += 1;
                    reporter.record(
                        ValidationIssue::new(
                            IssueKind::UnparsableValue,
                            format!("unparsable value '{cell}' for inferred type {column_type}"),
                        )
                        .at_row(row)
                        .in_column(&column.name),
                    );
                    *cell = Cell::Missing;
                }
            }
        }

        unparsable
    }
}

fn trim_text_cells(column: &mut Column, reporter: &mut ValidationReporter) {
    let mut trimmed = 0;
    for cell in column.values.iter_mut() {
        if let Cell::Text(s) = cell {
            let t = s.trim();
            if t.len() != s.len() {
                let t = t.to_owned();
                *s = t;
                trimmed += 1;
            }
        }
    }
    if trimmed > 0 {
        reporter.record(
            ValidationIssue::new(
                IssueKind::WhitespaceTrimmed,
                format!("trimmed surrounding whitespace in {trimmed} cells"),
            )
            .in_column(&column.name),
        );
    }
}

fn blank_text_to_missing(column: &mut Column, reporter: &mut ValidationReporter) {
    let mut blanked = 0;
    for cell in column.values.iter_mut() {
        if matches!(cell, Cell::Text(s) if s.trim().is_empty()) {
            *cell = Cell::Missing;
            blanked += 1;
        }
    }
    if blanked > 0 {
        reporter.record(
            ValidationIssue::new(
                IssueKind::BlankAsMissing,
                format!("treated {blanked} blank cells as missing"),
            )
            .in_column(&column.name),
        );
    }
}

fn build_profile(column: &Column, unparsable: usize) -> ColumnProfile {
    let missing = column.missing_count();
    let mut sample_values: Vec<String> = Vec::with_capacity(SAMPLE_SIZE);
    for cell in column.values.iter().filter(|c| !c.is_missing()) {
        if sample_values.len() == SAMPLE_SIZE {
            break;
        }
        let rendered = cell.to_string();
        if !sample_values.contains(&rendered) {
            sample_values.push(rendered);
        }
    }

    ColumnProfile {
        name: column.name.clone(),
        inferred_type: column.column_type,
        non_missing: column.len() - missing,
        missing,
        missing_percentage: percentage(missing, column.len()),
        distinct: distinct_count(&column.values),
        unparsable,
        sample_values,
    }
}
