//! Column name standardization.

use crate::reporting::{IssueKind, ValidationIssue, ValidationReporter};
use crate::types::Dataset;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

// Runs of anything that is not a lower-case ASCII letter or digit
static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex: non-alphanumeric run"));

/// Canonical form of a column name.
///
/// Trims, lower-cases, collapses every run of non-alphanumerics into one `_`
/// and strips leading and trailing `_`. A name with nothing left becomes
/// `column_<index>`.
pub fn standardize_name(raw: &str, index: usize) -> String {
    let lowered = raw.trim().to_lowercase();
    let replaced = NON_ALNUM_RUN.replace_all(&lowered, "_");
    let stripped = replaced.trim_matches('_');
    if stripped.is_empty() {
        format!("column_{index}")
    } else {
        stripped.to_string()
    }
}

/// A column whose name changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub original: String,
    pub standardized: String,
    /// Whether a suffix was needed to keep the name unique.
    pub collided: bool,
}

/// Rewrites column names to `[a-z0-9_]+`, suffixing collisions `_2`, `_3`, ...
#[derive(Debug, Default)]
pub struct NameStandardizer;

impl NameStandardizer {
    pub fn new() -> Self {
        Self
    }

    /// Rename every column in place. Returns the columns that changed.
    pub fn standardize(
        &self,
        dataset: &mut Dataset,
        reporter: &mut ValidationReporter,
    ) -> Vec<Rename> {
        let mut taken: HashSet<String> = HashSet::with_capacity(dataset.width());
        let mut renames = Vec::new();

        for (index, column) in dataset.columns_mut().iter_mut().enumerate() {
            let base = standardize_name(&column.name, index);
            let mut candidate = base.clone();
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            let collided = candidate != base;
            taken.insert(candidate.clone());

            if candidate == column.name {
                continue;
            }

            debug!("Renaming column '{}' to '{}'", column.name, candidate);
            reporter.record(
                ValidationIssue::new(
                    IssueKind::ColumnRenamed,
                    format!("renamed '{}' to '{}'", column.name, candidate),
                )
                .in_column(&candidate),
            );
            if collided {
                reporter.record(
                    ValidationIssue::new(
                        IssueKind::NameCollision,
                        format!(
                            "'{}' standardizes to '{}', which is already taken; renamed to '{}'",
                            column.name, base, candidate
                        ),
                    )
                    .in_column(&candidate),
                );
            }

            let original = std::mem::replace(&mut column.name, candidate.clone());
            renames.push(Rename {
                original,
                standardized: candidate,
                collided,
            });
        }

        renames
    }
}

/// Find a column by its standardized name, or by the name it had before
/// [`NameStandardizer::standardize`] renamed it.
///
/// The standardized name wins when both match. A name matching neither
/// resolves to nothing; it is never re-standardized, so it cannot land on a
/// collision sibling or a `column_<i>` fallback.
pub fn find_column(dataset: &Dataset, renames: &[Rename], name: &str) -> Option<usize> {
    dataset.column_index(name).or_else(|| {
        renames
            .iter()
            .find(|rename| rename.original == name)
            .and_then(|rename| dataset.column_index(&rename.standardized))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standardize_name() {
        assert_eq!(standardize_name("  Customer ID ", 0), "customer_id");
        assert_eq!(standardize_name("Price ($)", 1), "price");
        assert_eq!(standardize_name("e-mail__address", 2), "e_mail_address");
        assert_eq!(standardize_name("already_fine", 3), "already_fine");
        assert_eq!(standardize_name("   ", 4), "column_4");
        assert_eq!(standardize_name("%%%", 5), "column_5");
    }

    #[test]
    fn test_collisions_are_suffixed_in_order() {
        let mut ds = Dataset::new(vec![
            Column::new("Name", ["a"]),
            Column::new("name ", ["b"]),
            Column::new("NAME!", ["c"]),
            Column::new("id", ["d"]),
        ])
        .unwrap();
        let mut reporter = ValidationReporter::new();

        let renames = NameStandardizer::new().standardize(&mut ds, &mut reporter);

        assert_eq!(ds.column_names(), vec!["name", "name_2", "name_3", "id"]);
        assert_eq!(renames.len(), 3);
        assert!(renames[1].collided);
        assert_eq!(reporter.summary().columns_renamed(), 3);
        assert_eq!(reporter.summary().count(IssueKind::NameCollision), 2);
    }

    #[test]
    fn test_unchanged_names_emit_nothing() {
        let mut ds = Dataset::new(vec![Column::new("id", [1i64])]).unwrap();
        let mut reporter = ValidationReporter::new();

        let renames = NameStandardizer::new().standardize(&mut ds, &mut reporter);

        assert!(renames.is_empty());
        assert!(reporter.finalize().is_empty());
    }

    #[test]
    fn test_rename_issue_records_both_names() {
        let mut ds = Dataset::new(vec![Column::new("First Name", ["a"])]).unwrap();
        let mut reporter = ValidationReporter::new();

        NameStandardizer::new().standardize(&mut ds, &mut reporter);

        let report = reporter.finalize();
        assert_eq!(report.issues[0].message, "renamed 'First Name' to 'first_name'");
        assert_eq!(report.issues[0].column.as_deref(), Some("first_name"));
    }

    #[test]
    fn test_find_column_follows_renames() {
        let mut ds = Dataset::new(vec![
            Column::new("name", ["a"]),
            Column::new("Name", ["x"]),
            Column::new("%%%", ["y"]),
        ])
        .unwrap();
        let renames = NameStandardizer::new().standardize(&mut ds, &mut ValidationReporter::new());

        assert_eq!(ds.column_names(), vec!["name", "name_2", "column_2"]);
        assert_eq!(find_column(&ds, &renames, "name"), Some(0));
        // The original name reaches the suffixed column, not its sibling
        assert_eq!(find_column(&ds, &renames, "Name"), Some(1));
        assert_eq!(find_column(&ds, &renames, "%%%"), Some(2));
        assert_eq!(find_column(&ds, &renames, "NAME"), None);
        assert_eq!(find_column(&ds, &renames, "???"), None);
    }
}
