//! Validation reporting.
//!
//! Every stage records what it found and what it changed into a
//! [`ValidationReporter`]. At the end of a run the reporter is finalized into
//! an immutable [`ValidationReport`], which serializes to JSON and renders as
//! a polars table.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheet_cleaner::reporting::{IssueKind, ValidationIssue, ValidationReporter};
//!
//! let mut reporter = ValidationReporter::new();
//! reporter.record(ValidationIssue::new(IssueKind::EmptyColumn, "entire column empty").in_column("notes"));
//!
//! let report = reporter.finalize();
//! println!("{}", report.to_json_pretty()?);
//! ```

mod export;
mod issue;
mod reporter;

pub use export::NO_ISSUES_MESSAGE;
pub use issue::{IssueCategory, IssueKind, Severity, ValidationIssue};
pub use reporter::{ReportSummary, ValidationReport, ValidationReporter};
