//! Mutable issue sink for a single run, and the report it finalizes into.

use super::issue::{IssueKind, Severity, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// Counters kept alongside the issue list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Rows in the caller's input.
    pub rows_before: usize,
    /// Rows in the cleaned dataset.
    pub rows_after: usize,
    /// Columns in the dataset.
    pub columns: usize,
    /// Issues recorded per kind.
    pub counts: BTreeMap<IssueKind, usize>,
    /// Filled cells per (standardized) column name.
    pub cells_filled_by_column: BTreeMap<String, usize>,
    /// Number of warning-level issues.
    pub warnings: usize,
}

impl ReportSummary {
    /// Issues recorded for `kind`.
    pub fn count(&self, kind: IssueKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn duplicates_removed(&self) -> usize {
        self.count(IssueKind::DuplicateRemoved)
    }

    pub fn cells_filled(&self) -> usize {
        self.count(IssueKind::CellFilled)
    }

    pub fn columns_renamed(&self) -> usize {
        self.count(IssueKind::ColumnRenamed)
    }

    pub fn cells_filled_in(&self, column: &str) -> usize {
        self.cells_filled_by_column.get(column).copied().unwrap_or(0)
    }
}

/// Collects issues from every pipeline stage.
///
/// One reporter per run; it is consumed by [`finalize`](Self::finalize).
#[derive(Debug, Default)]
pub struct ValidationReporter {
    issues: Vec<ValidationIssue>,
    summary: ReportSummary,
}

impl ValidationReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue and update the counters.
    pub fn record(&mut self, issue: ValidationIssue) {
        *self.summary.counts.entry(issue.kind).or_insert(0) += 1;

        if issue.kind == IssueKind::CellFilled
            && let Some(column) = &issue.column
        {
            *self
                .summary
                .cells_filled_by_column
                .entry(column.clone())
                .or_insert(0) += 1;
        }

        match issue.severity {
            Severity::Warning => {
                self.summary.warnings += 1;
                warn!("{}", issue);
            }
            Severity::Info => trace!("{}", issue),
        }

        self.issues.push(issue);
    }

    /// Record the dataset shape before and after cleaning.
    pub fn set_shape(&mut self, rows_before: usize, rows_after: usize, columns: usize) {
        self.summary.rows_before = rows_before;
        self.summary.rows_after = rows_after;
        self.summary.columns = columns;
    }

    /// Counters so far.
    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Freeze the collected issues into a report.
    pub fn finalize(self) -> ValidationReport {
        ValidationReport {
            issues: self.issues,
            summary: self.summary,
        }
    }
}

/// Immutable outcome of a run: every issue in recording order plus counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub summary: ReportSummary,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.summary.warnings > 0
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_warning())
    }

    pub fn issues_of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    pub fn issues_for_column<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues
            .iter()
            .filter(move |i| i.column.as_deref() == Some(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_counters() {
        let mut reporter = ValidationReporter::new();
        reporter.record(ValidationIssue::new(IssueKind::CellFilled, "filled").at_row(0).in_column("a"));
        reporter.record(ValidationIssue::new(IssueKind::CellFilled, "filled").at_row(3).in_column("a"));
        reporter.record(ValidationIssue::new(IssueKind::CellFilled, "filled").at_row(1).in_column("b"));
        reporter.record(ValidationIssue::new(IssueKind::NameCollision, "collision").in_column("x_2"));

        let summary = reporter.summary();
        assert_eq!(summary.cells_filled(), 3);
        assert_eq!(summary.cells_filled_in("a"), 2);
        assert_eq!(summary.cells_filled_in("b"), 1);
        assert_eq!(summary.cells_filled_in("c"), 0);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.duplicates_removed(), 0);
    }

    #[test]
    fn test_finalize_preserves_order() {
        let mut reporter = ValidationReporter::new();
        reporter.record(ValidationIssue::new(IssueKind::TypeInferred, "first"));
        reporter.record(ValidationIssue::new(IssueKind::DuplicateRemoved, "second").at_row(4));
        reporter.set_shape(5, 4, 2);

        let report = reporter.finalize();
        let messages: Vec<_> = report.issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(report.summary.rows_before, 5);
        assert_eq!(report.summary.rows_after, 4);
        assert!(!report.has_warnings());
        assert_eq!(report.issues_of_kind(IssueKind::DuplicateRemoved).count(), 1);
    }

    #[test]
    fn test_summary_serializes_kind_keys() {
        let mut reporter = ValidationReporter::new();
        reporter.record(ValidationIssue::new(IssueKind::ColumnRenamed, "renamed"));
        let json = serde_json::to_string(reporter.summary()).unwrap();
        assert!(json.contains("\"column_renamed\":1"));
    }
}
