//! Missing value resolution per column type.

use super::statistical::{boolean_mode, integer_median, real_median};
use crate::config::CleaningConfig;
use crate::reporting::{IssueKind, ValidationIssue, ValidationReporter};
use crate::types::{Cell, Column, ColumnType, Dataset};
use tracing::{debug, info};

/// How a column's missing cells are handled.
#[derive(Debug, Clone, PartialEq)]
enum Resolution {
    Fill { value: Cell, description: String },
    NoData,
    ReportDates,
    Leave,
}

/// Fills missing cells according to each column's inferred type.
///
/// - integer, real: median of the present values
/// - boolean: mode, ties to `false`
/// - text, categorical: the configured placeholder
/// - date: left missing and reported
/// - unknown: left missing silently
///
/// Never adds or removes rows.
pub struct MissingValueResolver<'a> {
    config: &'a CleaningConfig,
}

impl<'a> MissingValueResolver<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self { config }
    }

    /// Resolve every column in place. Returns the number of cells filled.
    ///
    /// `row_origin[i]` is the caller's index for current row `i`.
    pub fn resolve(
        &self,
        dataset: &mut Dataset,
        row_origin: &[usize],
        reporter: &mut ValidationReporter,
    ) -> usize {
        let mut filled = 0;
        for column in dataset.columns_mut() {
            let missing: Vec<usize> = column
                .values
                .iter()
                .enumerate()
                .filter_map(|(row, cell)| cell.is_missing().then_some(row))
                .collect();
            if missing.is_empty() {
                continue;
            }

            match self.resolution_for(column) {
                Resolution::Fill { value, description } => {
                    debug!(
                        "Filling {} cells in '{}' with {}",
                        missing.len(),
                        column.name,
                        description
                    );
                    for &row in &missing {
                        column.values[row] = value.clone();
                        reporter.record(
                            ValidationIssue::new(
                                IssueKind::CellFilled,
                                format!("filled with {description}"),
                            )
                            .at_row(row_origin[row])
                            .in_column(&column.name),
                        );
                    }
                    filled += missing.len();
                }
                Resolution::NoData => {
                    reporter.record(
                        ValidationIssue::new(
                            IssueKind::ImputationImpossible,
                            "cannot impute: no data",
                        )
                        .in_column(&column.name),
                    );
                }
                Resolution::ReportDates => {
                    self.report_missing_dates(column, &missing, row_origin, reporter)
                }
                Resolution::Leave => {}
            }
        }

        info!("Filled {} missing cells", filled);
        filled
    }

    fn resolution_for(&self, column: &Column) -> Resolution {
        match column.column_type {
            ColumnType::Integer => {
                let present: Vec<i64> = column
                    .values
                    .iter()
                    .filter_map(|c| match c {
                        Cell::Integer(v) => Some(*v),
                        _ => None,
                    })
                    .collect();
                integer_median(&present).map_or(Resolution::NoData, |m| Resolution::Fill {
                    value: Cell::Integer(m),
                    description: format!("median {m}"),
                })
            }
            ColumnType::Real => {
                let present: Vec<f64> = column.values.iter().filter_map(Cell::as_f64).collect();
                real_median(&present).map_or(Resolution::NoData, |m| Resolution::Fill {
                    value: Cell::Real(m),
                    description: format!("median {m}"),
                })
            }
            ColumnType::Boolean => {
                let present: Vec<bool> = column
                    .values
                    .iter()
                    .filter_map(|c| match c {
                        Cell::Boolean(v) => Some(*v),
                        _ => None,
                    })
                    .collect();
                boolean_mode(&present).map_or(Resolution::NoData, |m| Resolution::Fill {
                    value: Cell::Boolean(m),
                    description: format!("mode {m}"),
                })
            }
            ColumnType::Text | ColumnType::Categorical => Resolution::Fill {
                value: Cell::text(self.config.fill_placeholder.as_str()),
                description: format!("placeholder \"{}\"", self.config.fill_placeholder),
            },
            ColumnType::Date => Resolution::ReportDates,
            ColumnType::Unknown => Resolution::Leave,
        }
    }

    fn report_missing_dates(
        &self,
        column: &Column,
        missing: &[usize],
        row_origin: &[usize],
        reporter: &mut ValidationReporter,
    ) {
        if missing.len() > self.config.missing_date_report_cap {
            reporter.record(
                ValidationIssue::new(
                    IssueKind::MissingDatesSummarized,
                    format!("{} missing dates left unfilled", missing.len()),
                )
                .in_column(&column.name),
            );
            return;
        }
        for &row in missing {
            reporter.record(
                ValidationIssue::new(IssueKind::MissingDate, "missing date left unfilled")
                    .at_row(row_origin[row])
                    .in_column(&column.name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn typed(name: &str, column_type: ColumnType, values: Vec<Cell>) -> Column {
        Column {
            name: name.to_string(),
            column_type,
            values,
        }
    }

    fn resolve(dataset: &mut Dataset, config: &CleaningConfig) -> ValidationReporter {
        let origin: Vec<usize> = (0..dataset.height()).collect();
        let mut reporter = ValidationReporter::new();
        MissingValueResolver::new(config).resolve(dataset, &origin, &mut reporter);
        reporter
    }

    #[test]
    fn test_numeric_columns_use_median() {
        let mut ds = Dataset::new(vec![
            typed("qty", ColumnType::Integer, vec![Cell::Integer(4), Cell::Missing, Cell::Integer(1), Cell::Integer(9)]),
            typed("price", ColumnType::Real, vec![Cell::Real(1.0), Cell::Real(2.0), Cell::Missing, Cell::Missing]),
        ])
        .unwrap();

        let reporter = resolve(&mut ds, &CleaningConfig::default());

        assert_eq!(ds.column("qty").unwrap().values[1], Cell::Integer(4));
        assert_eq!(ds.column("price").unwrap().values[3], Cell::Real(1.5));
        assert_eq!(reporter.summary().cells_filled(), 3);
        assert_eq!(reporter.summary().cells_filled_in("price"), 2);
    }

    #[test]
    fn test_all_missing_numeric_column_warns() {
        let mut ds = Dataset::new(vec![typed("qty", ColumnType::Integer, vec![Cell::Missing])]).unwrap();

        let reporter = resolve(&mut ds, &CleaningConfig::default());

        let report = reporter.finalize();
        assert!(ds.column("qty").unwrap().values[0].is_missing());
        assert_eq!(report.issues[0].kind, IssueKind::ImputationImpossible);
        assert_eq!(report.issues[0].message, "cannot impute: no data");
    }

    #[test]
    fn test_boolean_and_text_fills() {
        let config = CleaningConfig::builder().fill_placeholder("N/A").build().unwrap();
        let mut ds = Dataset::new(vec![
            typed("flag", ColumnType::Boolean, vec![Cell::Boolean(true), Cell::Boolean(false), Cell::Missing]),
            typed("city", ColumnType::Categorical, vec![Cell::text("Oslo"), Cell::Missing, Cell::Missing]),
        ])
        .unwrap();

        resolve(&mut ds, &config);

        assert_eq!(ds.column("flag").unwrap().values[2], Cell::Boolean(false));
        assert_eq!(ds.column("city").unwrap().values[1], Cell::text("N/A"));
    }

    #[test]
    fn test_missing_dates_reported_per_cell_up_to_cap() {
        let date = Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let config = CleaningConfig::builder().missing_date_report_cap(2).build().unwrap();

        let mut few = Dataset::new(vec![typed("d", ColumnType::Date, vec![date.clone(), Cell::Missing, Cell::Missing])]).unwrap();
        let reporter = resolve(&mut few, &config);
        assert_eq!(reporter.summary().count(IssueKind::MissingDate), 2);
        assert_eq!(reporter.summary().cells_filled(), 0);

        let mut many = Dataset::new(vec![typed(
            "d",
            ColumnType::Date,
            vec![date, Cell::Missing, Cell::Missing, Cell::Missing],
        )])
        .unwrap();
        let reporter = resolve(&mut many, &config);
        assert_eq!(reporter.summary().count(IssueKind::MissingDate), 0);
        assert_eq!(reporter.summary().count(IssueKind::MissingDatesSummarized), 1);
        assert!(many.column("d").unwrap().values[3].is_missing());
    }

    #[test]
    fn test_unknown_columns_are_left_alone() {
        let mut ds = Dataset::new(vec![typed("x", ColumnType::Unknown, vec![Cell::Missing, Cell::Missing])]).unwrap();

        let reporter = resolve(&mut ds, &CleaningConfig::default());

        assert!(reporter.finalize().is_empty());
        assert_eq!(ds.column("x").unwrap().missing_count(), 2);
    }

    #[test]
    fn test_fill_issues_cite_origin_rows() {
        let mut ds = Dataset::new(vec![typed("city", ColumnType::Text, vec![Cell::text("a"), Cell::Missing])]).unwrap();
        let mut reporter = ValidationReporter::new();

        MissingValueResolver::new(&CleaningConfig::default()).resolve(&mut ds, &[0, 7], &mut reporter);

        assert_eq!(reporter.finalize().issues[0].row, Some(7));
    }
}
