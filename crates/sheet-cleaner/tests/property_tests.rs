//! Property-based tests for the cleaning pipeline.
//!
//! Uses proptest to check that the cleaning invariants hold across random
//! small tables.

use proptest::prelude::*;
use sheet_cleaner::{
    Cell, CleaningConfig, Column, ColumnType, Dataset, IssueKind, NameStandardizer,
    ValidationReporter, clean,
};
use std::collections::HashSet;

type Row = (Option<i64>, Option<String>, Option<f64>, Option<bool>);

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        prop::option::of(0i64..5),
        prop::option::of(
            prop::sample::select(vec!["alice", "bob", "carol", "dave"]).prop_map(String::from),
        ),
        prop::option::of(prop::sample::select(vec![0.5f64, 1.0, 2.5, -3.0])),
        prop::option::of(any::<bool>()),
    )
}

/// Rows whose key column is always present.
fn keyed_row_strategy() -> impl Strategy<Value = Row> {
    (0i64..5, row_strategy()).prop_map(|(id, (_, name, score, flag))| (Some(id), name, score, flag))
}

fn build(rows: &[Row]) -> Dataset {
    Dataset::new(vec![
        Column::new("ID", rows.iter().map(|r| Cell::from(r.0))),
        Column::new("Full Name", rows.iter().map(|r| Cell::from(r.1.clone()))),
        Column::new("Score (%)", rows.iter().map(|r| Cell::from(r.2))),
        Column::new("Active?", rows.iter().map(|r| Cell::from(r.3))),
    ])
    .unwrap()
}

fn keyed_config() -> CleaningConfig {
    CleaningConfig::builder().dedup_key(["id"]).build().unwrap()
}

proptest! {
    /// Property: the same input and configuration give the same output
    #[test]
    fn prop_clean_is_deterministic(rows in prop::collection::vec(row_strategy(), 0..20)) {
        let config = CleaningConfig::default();
        let first = clean(build(&rows), &config).unwrap();
        let second = clean(build(&rows), &config).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: standardized names are non-empty, unique and use only [a-z0-9_]
    #[test]
    fn prop_standardized_names_are_clean(
        headers in prop::collection::hash_set("[ -~]{0,8}", 1..8)
    ) {
        let columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(h.as_str(), [Cell::Missing]))
            .collect();
        let mut dataset = Dataset::new(columns).unwrap();
        let mut reporter = ValidationReporter::new();

        NameStandardizer::new().standardize(&mut dataset, &mut reporter);

        let names = dataset.column_names();
        let unique: HashSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(unique.len(), names.len());
        for name in names {
            prop_assert!(!name.is_empty());
            prop_assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "bad name {:?}",
                name
            );
        }
    }

    /// Property: every removed row repeats the key of an earlier row, and the
    /// earliest occurrence of each key survives
    #[test]
    fn prop_first_occurrence_survives(rows in prop::collection::vec(row_strategy(), 0..20)) {
        let (_, report) = clean(build(&rows), &keyed_config()).unwrap();

        let mut first_seen: Vec<(Option<i64>, usize)> = Vec::new();
        let mut expected = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            match first_seen.iter().find(|(id, _)| *id == row.0) {
                Some(&(_, first)) => expected.push(format!("row {index} duplicates row {first}")),
                None => first_seen.push((row.0, index)),
            }
        }

        let actual: Vec<String> = report
            .issues_of_kind(IssueKind::DuplicateRemoved)
            .map(|i| i.message.clone())
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(report.summary.rows_after, first_seen.len());
    }

    /// Property: a numeric or boolean column with any data ends with no gaps
    #[test]
    fn prop_imputable_columns_have_no_gaps(rows in prop::collection::vec(row_strategy(), 0..20)) {
        let (cleaned, _) = clean(build(&rows), &keyed_config()).unwrap();

        for column in cleaned.columns() {
            let imputable = column.column_type.is_numeric() || column.column_type == ColumnType::Boolean;
            if imputable {
                prop_assert!(column.is_all_missing() || column.missing_count() == 0);
            }
        }
    }

    /// Property: cleaning a cleaned table removes and fills nothing
    #[test]
    fn prop_clean_is_idempotent(rows in prop::collection::vec(keyed_row_strategy(), 0..20)) {
        let config = keyed_config();
        let (once, _) = clean(build(&rows), &config).unwrap();
        let (twice, report) = clean(once.clone(), &config).unwrap();

        prop_assert_eq!(report.summary.duplicates_removed(), 0);
        prop_assert_eq!(report.summary.cells_filled(), 0);
        prop_assert_eq!(report.summary.columns_renamed(), 0);
        prop_assert_eq!(once.height(), twice.height());
    }

    /// Property: every row-level issue points into the input
    #[test]
    fn prop_issue_rows_are_in_range(rows in prop::collection::vec(row_strategy(), 0..20)) {
        let (_, report) = clean(build(&rows), &keyed_config()).unwrap();

        for issue in &report.issues {
            if let Some(row) = issue.row {
                prop_assert!(row < rows.len());
            }
        }
    }
}
