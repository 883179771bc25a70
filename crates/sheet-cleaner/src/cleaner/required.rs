//! Required-column validation.

use super::names::{Rename, find_column};
use crate::reporting::{IssueKind, ValidationIssue, ValidationReporter};
use crate::types::Dataset;

/// Checks caller-declared required columns after names are standardized.
///
/// A required name matches a standardized column name, or the original name
/// of a renamed column, so `"Customer ID"` finds `customer_id` when that is
/// the header it came from. Missing cells are counted as they stand, before
/// imputation fills them.
pub struct RequiredColumnCheck<'a> {
    required: &'a [String],
    renames: &'a [Rename],
}

impl<'a> RequiredColumnCheck<'a> {
    pub fn new(required: &'a [String]) -> Self {
        Self {
            required,
            renames: &[],
        }
    }

    /// Also accept the pre-standardization names of renamed columns.
    pub fn with_renames(mut self, renames: &'a [Rename]) -> Self {
        self.renames = renames;
        self
    }

    /// Record a warning per unmet requirement. Returns how many were unmet.
    pub fn check(&self, dataset: &Dataset, reporter: &mut ValidationReporter) -> usize {
        let mut unmet = 0;
        for raw in self.required {
            let found = find_column(dataset, self.renames, raw).map(|i| &dataset.columns()[i]);
            match found {
                None => {
                    unmet += 1;
                    reporter.record(
                        ValidationIssue::new(
                            IssueKind::MissingRequiredColumn,
                            format!("required column '{raw}' is missing"),
                        )
                        .in_column(raw.as_str()),
                    );
                }
                Some(column) => {
                    let name = &column.name;
                    let missing = column.missing_count();
                    if missing > 0 {
                        unmet += 1;
                        reporter.record(
                            ValidationIssue::new(
                                IssueKind::RequiredColumnIncomplete,
                                format!("required column '{name}' has {missing} missing values"),
                            )
                            .in_column(name.as_str()),
                        );
                    }
                }
            }
        }
        unmet
    }
}
