//! Type inference cascade and cell coercion.
//!
//! Candidates are tried in a fixed order: integer, real, boolean, date. The
//! first one that enough non-missing cells agree on wins. Otherwise the column
//! is categorical when its distinct values fit under the cardinality
//! threshold, and text when they don't.

use crate::types::{Cell, ColumnType};
use crate::utils::{parse_boolean_token, parse_date, parse_integer_literal, parse_real_literal};
use chrono::NaiveDate;
use std::collections::HashSet;

// Share comparisons run in floating point; 0.9 * 10 must still accept 9 hits.
const AGREEMENT_EPSILON: f64 = 1e-9;

pub(crate) fn cell_as_integer(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Integer(v) => Some(*v),
        Cell::Text(s) => parse_integer_literal(s),
        _ => None,
    }
}

pub(crate) fn cell_as_real(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Integer(v) => Some(*v as f64),
        Cell::Real(v) if v.is_finite() => Some(*v),
        Cell::Text(s) => parse_real_literal(s),
        _ => None,
    }
}

pub(crate) fn cell_as_boolean(cell: &Cell) -> Option<bool> {
    match cell {
        Cell::Boolean(v) => Some(*v),
        Cell::Integer(0) => Some(false),
        Cell::Integer(1) => Some(true),
        Cell::Text(s) => parse_boolean_token(s),
        _ => None,
    }
}

pub(crate) fn cell_as_date<S: AsRef<str>>(cell: &Cell, formats: &[S]) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => parse_date(s, formats),
        _ => None,
    }
}

/// Count the non-missing cells accepted by `parses`.
fn count_hits<F>(present: &[&Cell], parses: F) -> usize
where
    F: Fn(&Cell) -> bool,
{
    present.iter().filter(|cell| parses(cell)).count()
}

/// Infer the semantic type of a column from its cells.
///
/// `agreement` is the share of non-missing cells that must parse as a
/// candidate type for it to be accepted.
pub(crate) fn infer_column_type<S: AsRef<str>>(
    values: &[Cell],
    date_formats: &[S],
    agreement: f64,
    cardinality_threshold: usize,
) -> ColumnType {
    let present: Vec<&Cell> = values.iter().filter(|c| !c.is_missing()).collect();
    if present.is_empty() {
        return ColumnType::Unknown;
    }

    let required = agreement * present.len() as f64 - AGREEMENT_EPSILON;
    let accepts = |hits: usize| hits as f64 >= required;

    if accepts(count_hits(&present, |c| cell_as_integer(c).is_some())) {
        return ColumnType::Integer;
    }
    if accepts(count_hits(&present, |c| cell_as_real(c).is_some())) {
        return ColumnType::Real;
    }
    if accepts(count_hits(&present, |c| cell_as_boolean(c).is_some())) {
        return ColumnType::Boolean;
    }
    if accepts(count_hits(&present, |c| cell_as_date(c, date_formats).is_some())) {
        return ColumnType::Date;
    }

    if distinct_within(&present, cardinality_threshold) {
        ColumnType::Categorical
    } else {
        ColumnType::Text
    }
}

/// Whether the number of distinct rendered values is at most `limit`.
fn distinct_within(present: &[&Cell], limit: usize) -> bool {
    let mut seen: HashSet<String> = HashSet::new();
    for cell in present {
        seen.insert(cell.to_string());
        if seen.len() > limit {
            return false;
        }
    }
    true
}

/// Count distinct non-missing values by their rendered form.
pub(crate) fn distinct_count(values: &[Cell]) -> usize {
    values
        .iter()
        .filter(|c| !c.is_missing())
        .map(ToString::to_string)
        .collect::<HashSet<_>>()
        .len()
}

/// Convert a cell to the representation of `column_type`.
///
/// Returns `None` when a non-missing cell does not parse as the type.
pub(crate) fn coerce_cell<S: AsRef<str>>(
    cell: &Cell,
    column_type: ColumnType,
    date_formats: &[S],
) -> Option<Cell> {
    if cell.is_missing() {
        return Some(Cell::Missing);
    }
    match column_type {
        ColumnType::Integer => cell_as_integer(cell).map(Cell::Integer),
        ColumnType::Real => cell_as_real(cell).map(Cell::Real),
        ColumnType::Boolean => cell_as_boolean(cell).map(Cell::Boolean),
        ColumnType::Date => cell_as_date(cell, date_formats).map(Cell::Date),
        ColumnType::Text | ColumnType::Categorical => match cell {
            Cell::Text(_) => Some(cell.clone()),
            other => Some(Cell::Text(other.to_string())),
        },
        ColumnType::Unknown => Some(cell.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DATE_FORMATS;

    fn texts(values: &[&str]) -> Vec<Cell> {
        values
            .iter()
            .map(|v| if v.is_empty() { Cell::Missing } else { Cell::text(*v) })
            .collect()
    }

    fn infer(values: &[Cell]) -> ColumnType {
        infer_column_type(values, &DEFAULT_DATE_FORMATS, 1.0, 20)
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(infer(&texts(&["1", "2", "42"])), ColumnType::Integer);
        assert_eq!(infer(&texts(&["1", "2.5", "-3"])), ColumnType::Real);
        assert_eq!(infer(&texts(&["yes", "No", "TRUE"])), ColumnType::Boolean);
        assert_eq!(infer(&texts(&["2024-01-05", "2023-12-31"])), ColumnType::Date);
        assert_eq!(infer(&texts(&["red", "blue", "red"])), ColumnType::Categorical);
    }

    #[test]
    fn test_zero_one_column_is_integer() {
        // integer comes before boolean in the cascade
        assert_eq!(infer(&texts(&["0", "1", "1"])), ColumnType::Integer);
    }

    #[test]
    fn test_native_cells() {
        assert_eq!(infer(&[Cell::Integer(1), Cell::Missing]), ColumnType::Integer);
        assert_eq!(infer(&[Cell::Real(1.0), Cell::Integer(2)]), ColumnType::Real);
        assert_eq!(infer(&[Cell::Boolean(true), Cell::Boolean(false)]), ColumnType::Boolean);
    }

    #[test]
    fn test_all_missing_is_unknown() {
        assert_eq!(infer(&[Cell::Missing, Cell::Missing]), ColumnType::Unknown);
        assert_eq!(infer(&[]), ColumnType::Unknown);
    }

    #[test]
    fn test_high_cardinality_is_text() {
        let values: Vec<Cell> = (0..30).map(|i| Cell::text(format!("name {i}"))).collect();
        assert_eq!(infer(&values), ColumnType::Text);
        assert_eq!(
            infer_column_type(&values, &DEFAULT_DATE_FORMATS, 1.0, 30),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_mixed_values_fall_back() {
        let values = texts(&["1", "two", "3"]);
        assert_eq!(infer_column_type(&values, &DEFAULT_DATE_FORMATS, 1.0, 1), ColumnType::Text);
    }

    #[test]
    fn test_partial_agreement() {
        let mut values = texts(&["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        values.push(Cell::text("oops"));
        assert_eq!(infer_column_type(&values, &DEFAULT_DATE_FORMATS, 0.9, 0), ColumnType::Integer);
        assert_eq!(infer_column_type(&values, &DEFAULT_DATE_FORMATS, 1.0, 0), ColumnType::Text);
    }

    #[test]
    fn test_coerce_cell() {
        let formats = DEFAULT_DATE_FORMATS;
        assert_eq!(coerce_cell(&Cell::text("42"), ColumnType::Integer, &formats), Some(Cell::Integer(42)));
        assert_eq!(coerce_cell(&Cell::text("Yes"), ColumnType::Boolean, &formats), Some(Cell::Boolean(true)));
        assert_eq!(
            coerce_cell(&Cell::text("2024-01-05"), ColumnType::Date, &formats),
            Some(Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()))
        );
        assert_eq!(coerce_cell(&Cell::Integer(7), ColumnType::Text, &formats), Some(Cell::text("7")));
        assert_eq!(coerce_cell(&Cell::text("x"), ColumnType::Integer, &formats), None);
        assert_eq!(coerce_cell(&Cell::Missing, ColumnType::Integer, &formats), Some(Cell::Missing));
    }

    #[test]
    fn test_distinct_count() {
        assert_eq!(distinct_count(&texts(&["a", "b", "a", ""])), 2);
    }
}
