//! Conversion between [`Dataset`] and polars [`DataFrame`].
//!
//! Reading collapses polars nulls and NaN floats into [`Cell::Missing`].
//! Writing maps each inferred type onto a typed polars column; a column whose
//! cells don't all match its type is written as text.

use crate::error::{Result, ResultExt};
use crate::types::{Cell, Column, ColumnType, Dataset};
use chrono::{Datelike, NaiveDate};
use polars::prelude::Column as FrameColumn;
use polars::prelude::*;

// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Read one polars series into cells.
fn series_to_cells(series: &Series) -> Result<Vec<Cell>> {
    let cells = match series.dtype() {
        DataType::Null => vec![Cell::Missing; series.len()],
        DataType::Boolean => series.bool()?.into_iter().map(Cell::from).collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| v.map_or(Cell::Missing, Cell::text))
            .collect(),
        DataType::Date | DataType::Datetime(_, _) => {
            let dates = series.cast(&DataType::Date)?;
            let days = dates.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|d| d.and_then(epoch_days_to_date).map_or(Cell::Missing, Cell::Date))
                .collect()
        }
        dtype if dtype.is_integer() => {
            let ints = series.cast(&DataType::Int64)?;
            ints.i64()?.into_iter().map(Cell::from).collect()
        }
        dtype if dtype.is_float() => {
            let floats = series.cast(&DataType::Float64)?;
            floats
                .f64()?
                .into_iter()
                .map(|v| v.map_or(Cell::Missing, Cell::real))
                .collect()
        }
        _ => {
            let text = series.cast(&DataType::String)?;
            text.str()?
                .into_iter()
                .map(|v| v.map_or(Cell::Missing, Cell::text))
                .collect()
        }
    };
    Ok(cells)
}

/// Collect typed values, `None` if any non-missing cell doesn't match.
fn collect_typed<T, F>(values: &[Cell], pick: F) -> Option<Vec<Option<T>>>
where
    F: Fn(&Cell) -> Option<T>,
{
    values
        .iter()
        .map(|cell| {
            if cell.is_missing() {
                Some(None)
            } else {
                pick(cell).map(Some)
            }
        })
        .collect()
}

fn text_series(name: PlSmallStr, values: &[Cell]) -> Series {
    let rendered: Vec<Option<String>> = values
        .iter()
        .map(|cell| (!cell.is_missing()).then(|| cell.to_string()))
        .collect();
    Series::new(name, rendered)
}

/// Write one column as a typed polars series.
fn column_to_series(column: &Column) -> Result<Series> {
    let name: PlSmallStr = column.name.as_str().into();
    let values = &column.values;

    let typed = match column.column_type {
        ColumnType::Integer => collect_typed(values, |c| match c {
            Cell::Integer(v) => Some(*v),
            _ => None,
        })
        .map(|v| Series::new(name.clone(), v)),
        ColumnType::Real => {
            collect_typed(values, Cell::as_f64).map(|v| Series::new(name.clone(), v))
        }
        ColumnType::Boolean => collect_typed(values, |c| match c {
            Cell::Boolean(v) => Some(*v),
            _ => None,
        })
        .map(|v| Series::new(name.clone(), v)),
        ColumnType::Date => {
            let days = collect_typed(values, |c| match c {
                Cell::Date(d) => Some(date_to_epoch_days(*d)),
                _ => None,
            });
            match days {
                Some(days) => Some(
                    Series::new(name.clone(), days)
                        .cast(&DataType::Date)
                        .context(format!("Failed to write date column '{}'", column.name))?,
                ),
                None => None,
            }
        }
        ColumnType::Unknown if column.is_all_missing() => {
            Some(Series::full_null(name.clone(), column.len(), &DataType::String))
        }
        _ => None,
    };

    Ok(typed.unwrap_or_else(|| text_series(name, values)))
}

impl Dataset {
    /// Build an unprofiled dataset from a polars frame.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let series = col.as_materialized_series();
            let cells = series_to_cells(series)
                .context(format!("Failed to read column '{}'", series.name()))?;
            columns.push(Column::new(series.name().as_str(), cells));
        }
        Dataset::new(columns)
    }

    /// Render as a polars frame with one typed column per column.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<FrameColumn> = Vec::with_capacity(self.width());
        for column in self.columns() {
            columns.push(column_to_series(column)?.into_column());
        }
        DataFrame::new(columns).context("Failed to build DataFrame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_days() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(epoch), 0);
        assert_eq!(epoch_days_to_date(0), Some(epoch));
        assert_eq!(
            epoch_days_to_date(19_727),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn test_from_dataframe_collapses_nulls_and_nan() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), &[Some(1i64), None, Some(3)]).into_column(),
            Series::new("score".into(), &[Some(1.5f64), Some(f64::NAN), None]).into_column(),
            Series::new("name".into(), &[Some("Bob"), None, Some("")]).into_column(),
        ])
        .unwrap();

        let ds = Dataset::from_dataframe(&df).unwrap();

        assert_eq!(ds.shape(), (3, 3));
        assert_eq!(ds.column("id").unwrap().values[0], Cell::Integer(1));
        assert!(ds.column("id").unwrap().values[1].is_missing());
        assert!(ds.column("score").unwrap().values[1].is_missing());
        assert!(ds.column("score").unwrap().values[2].is_missing());
        assert_eq!(ds.column("name").unwrap().values[2], Cell::text(""));
    }

    #[test]
    fn test_to_dataframe_uses_inferred_types() {
        let ds = Dataset::new(vec![
            Column {
                name: "id".to_string(),
                column_type: ColumnType::Integer,
                values: vec![Cell::Integer(1), Cell::Missing],
            },
            Column {
                name: "joined".to_string(),
                column_type: ColumnType::Date,
                values: vec![Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()), Cell::Missing],
            },
            Column {
                name: "notes".to_string(),
                column_type: ColumnType::Unknown,
                values: vec![Cell::Missing, Cell::Missing],
            },
        ])
        .unwrap();

        let df = ds.to_dataframe().unwrap();

        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("joined").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("notes").unwrap().null_count(), 2);

        let back = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(
            back.column("joined").unwrap().values[0],
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
    }

    #[test]
    fn test_mismatched_cells_fall_back_to_text() {
        let ds = Dataset::new(vec![Column {
            name: "mixed".to_string(),
            column_type: ColumnType::Integer,
            values: vec![Cell::Integer(1), Cell::text("x")],
        }])
        .unwrap();

        let df = ds.to_dataframe().unwrap();
        assert_eq!(df.column("mixed").unwrap().dtype(), &DataType::String);
    }
}
