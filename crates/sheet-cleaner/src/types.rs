//! In-memory tabular data model.
//!
//! A [`Dataset`] is an ordered sequence of named [`Column`]s of equal length.
//! Each cell is a [`Cell`]: a typed value or the explicit [`Cell::Missing`]
//! marker, which is distinct from an empty string or zero.

use crate::error::{CleaningError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Semantic type of a column, inferred once per pipeline run.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Real,
    Boolean,
    Text,
    Date,
    Categorical,
    #[default]
    Unknown,
}

impl ColumnType {
    /// Lower-case name used in reports and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Date => "date",
            Self::Categorical => "categorical",
            Self::Unknown => "unknown",
        }
    }

    /// Integer or real.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value.
///
/// Equality and hashing treat two `Missing` cells as equal, which is what
/// duplicate detection needs. Reals compare by value with `-0.0 == 0.0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Missing,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Build a real cell; NaN collapses into the missing marker.
    pub fn real(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Real(value)
        }
    }

    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric view of integer and real cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn real_bits(value: f64) -> u64 {
    // -0.0 and 0.0 must hash alike since they compare equal
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Missing, Cell::Missing) => true,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Real(a), Cell::Real(b)) => real_bits(*a) == real_bits(*b),
            (Cell::Boolean(a), Cell::Boolean(b)) => a == b,
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Date(a), Cell::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Missing => {}
            Cell::Integer(v) => v.hash(state),
            Cell::Real(v) => real_bits(*v).hash(state),
            Cell::Boolean(v) => v.hash(state),
            Cell::Text(v) => v.hash(state),
            Cell::Date(v) => v.hash(state),
        }
    }
}

/// Renders the value as it would appear in a text cell. Missing renders empty.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Real(v) => write!(f, "{v}"),
            Cell::Boolean(v) => write!(f, "{v}"),
            Cell::Text(v) => f.write_str(v),
            Cell::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Integer(i64::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::real(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Boolean(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

/// A named, typed, ordered sequence of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub values: Vec<Cell>,
}

impl Column {
    /// Create an unprofiled column.
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        Self {
            name: name.into(),
            column_type: ColumnType::Unknown,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Whether every cell is missing (true for a zero-length column).
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Cell::is_missing)
    }
}

/// An ordered set of uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Create a dataset, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(CleaningError::DuplicateColumnName(column.name.clone()));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(CleaningError::RaggedColumns {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Build a dataset from a header row and row-major records.
    ///
    /// Short records are padded with missing cells; extra cells are an error.
    pub fn from_rows<H, R, V>(headers: &[H], rows: R) -> Result<Self>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<V>>,
        V: Into<Cell>,
    {
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(h.as_ref(), Vec::<Cell>::new()))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > columns.len() {
                return Err(CleaningError::RaggedColumns {
                    column: format!("row {row_idx}"),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            let mut cells = row.into_iter().map(Into::into);
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or_default());
            }
        }

        Self::new(columns)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Mutable access for pipeline stages. Stages must keep names unique and
    /// lengths equal.
    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.height() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// Keep the rows whose flag is set, preserving their order.
    ///
    /// `keep` holds one flag per row.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.height(), "one keep flag per row");
        for column in &mut self.columns {
            let mut flags = keep.iter().copied();
            column.values.retain(|_| flags.next().unwrap_or(true));
        }
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_is_distinct_from_empty_and_zero() {
        assert_ne!(Cell::Missing, Cell::text(""));
        assert_ne!(Cell::Missing, Cell::Integer(0));
        assert_eq!(Cell::Missing, Cell::Missing);
    }

    #[test]
    fn test_nan_collapses_to_missing() {
        assert!(Cell::from(f64::NAN).is_missing());
        assert!(Cell::from(None::<i64>).is_missing());
        assert_eq!(Cell::from(Some("a")), Cell::text("a"));
    }

    #[test]
    fn test_signed_zero_hashes_alike() {
        let mut counts: HashMap<Cell, usize> = HashMap::new();
        *counts.entry(Cell::Real(0.0)).or_default() += 1;
        *counts.entry(Cell::Real(-0.0)).or_default() += 1;
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Integer(42).to_string(), "42");
        assert_eq!(Cell::Real(2.5).to_string(), "2.5");
        assert_eq!(Cell::Boolean(true).to_string(), "true");
        assert_eq!(
            Cell::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()).to_string(),
            "2024-03-09"
        );
        assert_eq!(Cell::Missing.to_string(), "");
    }

    #[test]
    fn test_dataset_rejects_duplicate_names() {
        let result = Dataset::new(vec![Column::new("a", [1i64]), Column::new("a", [2i64])]);
        assert!(matches!(
            result.unwrap_err(),
            CleaningError::DuplicateColumnName(name) if name == "a"
        ));
    }

    #[test]
    fn test_dataset_rejects_ragged_columns() {
        let result = Dataset::new(vec![
            Column::new("a", [1i64, 2]),
            Column::new("b", [1i64]),
        ]);
        assert!(matches!(
            result.unwrap_err(),
            CleaningError::RaggedColumns { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn test_from_rows_pads_short_records() {
        let ds = Dataset::from_rows(
            &["id", "name"],
            vec![
                vec![Cell::from(1i64), Cell::from("Bob")],
                vec![Cell::from(2i64)],
            ],
        )
        .unwrap();

        assert_eq!(ds.shape(), (2, 2));
        assert!(ds.column("name").unwrap().values[1].is_missing());
    }

    #[test]
    fn test_from_rows_rejects_long_records() {
        let result = Dataset::from_rows(&["id"], vec![vec![Cell::from(1i64), Cell::from(2i64)]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_retain_rows_preserves_order() {
        let mut ds = Dataset::new(vec![
            Column::new("a", [1i64, 2, 3, 4]),
            Column::new("b", ["w", "x", "y", "z"]),
        ])
        .unwrap();

        ds.retain_rows(&[true, false, true, false]);

        assert_eq!(ds.height(), 2);
        assert_eq!(ds.column("a").unwrap().values, vec![Cell::Integer(1), Cell::Integer(3)]);
        assert_eq!(ds.row(1).unwrap(), vec![&Cell::Integer(3), &Cell::text("y")]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "one keep flag per row")]
    fn test_retain_rows_rejects_short_flags() {
        let mut ds = Dataset::new(vec![Column::new("a", [1i64, 2, 3])]).unwrap();
        ds.retain_rows(&[true, false]);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::empty();
        assert_eq!(ds.shape(), (0, 0));
        assert!(ds.row(0).is_none());
    }
}
