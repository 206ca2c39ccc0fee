//! Conversion between [`Dataset`] and a polars [`DataFrame`].

use super::{Cell, Column, ColumnType, Dataset};
use crate::error::{CleaningError, Result, ResultExt};
use crate::utils::{is_float_dtype, is_integer_dtype};
use polars::prelude::{Column as FrameColumn, DataFrame, DataType, NamedFrom, Series};
use std::collections::HashSet;
use tracing::debug;

impl Dataset {
    /// Build a dataset from a polars DataFrame.
    ///
    /// Integer dtypes become [`ColumnType::Integer`], floats
    /// [`ColumnType::Float`], strings [`ColumnType::Text`], booleans
    /// [`ColumnType::Boolean`] and all-null columns [`ColumnType::Unresolved`].
    /// Any other dtype (dates, durations, ...) is rendered to text. Nulls and
    /// NaN become [`Cell::Absent`].
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let series = col.as_materialized_series();
            columns.push(
                column_from_series(series)
                    .context(format!("Reading column '{}'", series.name()))?,
            );
        }
        debug!("Converted DataFrame {:?} into dataset", df.shape());
        Dataset::new(columns)
    }

    /// Convert the dataset into a polars DataFrame.
    ///
    /// Absent cells become nulls. Fails if column names are not unique.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut seen = HashSet::new();
        if let Some(name) = self.column_names().into_iter().find(|n| !seen.insert(*n)) {
            return Err(CleaningError::InvalidDataset(format!(
                "column name '{}' is used more than once; rename it first",
                name
            )));
        }

        let columns: Vec<FrameColumn> = self
            .columns()
            .iter()
            .map(|c| column_to_series(c).into())
            .collect();
        DataFrame::new(columns).context("Building DataFrame from dataset")
    }
}

fn column_from_series(series: &Series) -> Result<Column> {
    let name = series.name().as_str();
    let dtype = series.dtype();

    if is_integer_dtype(dtype) {
        let casted = series.cast(&DataType::Int64)?;
        let values: Vec<Option<i64>> = casted.i64()?.into_iter().collect();
        return Ok(Column::integer(name, values));
    }

    if is_float_dtype(dtype) {
        let casted = series.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = casted.f64()?.into_iter().collect();
        return Ok(Column::float(name, values));
    }

    match dtype {
        DataType::Boolean => {
            let values: Vec<Option<bool>> = series.bool()?.into_iter().collect();
            Ok(Column::boolean(name, values))
        }
        DataType::String => {
            let values: Vec<Option<&str>> = series.str()?.into_iter().collect();
            Ok(Column::text(name, values))
        }
        DataType::Null => Ok(Column::unresolved(name, series.len())),
        _ => {
            let casted = series.cast(&DataType::String)?;
            let values: Vec<Option<&str>> = casted.str()?.into_iter().collect();
            Ok(Column::text(name, values))
        }
    }
}

fn column_to_series(column: &Column) -> Series {
    let name = column.name();
    match column.dtype() {
        ColumnType::Integer => {
            let values: Vec<Option<i64>> = column
                .cells()
                .iter()
                .map(|c| c.as_number().map(|n| n as i64))
                .collect();
            Series::new(name.into(), values)
        }
        ColumnType::Float => {
            let values: Vec<Option<f64>> = column.cells().iter().map(Cell::as_number).collect();
            Series::new(name.into(), values)
        }
        ColumnType::Boolean => {
            let values: Vec<Option<bool>> = column.cells().iter().map(Cell::as_bool).collect();
            Series::new(name.into(), values)
        }
        ColumnType::Text | ColumnType::Unresolved => {
            let values: Vec<Option<String>> = column.cells().iter().map(Cell::render).collect();
            Series::new(name.into(), values)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dataset::{Cell, Column as DataColumn, ColumnType, Dataset};
    use crate::error::CleaningError;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_dataframe_maps_dtypes() {
        let df = df![
            "id" => [Some(1i64), Some(2), None],
            "score" => [Some(1.5f64), Some(f64::NAN), Some(3.0)],
            "label" => [Some("a"), None, Some("c")],
            "flag" => [Some(true), Some(false), None],
        ]
        .unwrap();

        let ds = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(ds.shape(), (3, 4));
        assert_eq!(ds.column("id").unwrap().dtype(), ColumnType::Integer);
        assert_eq!(ds.column("score").unwrap().dtype(), ColumnType::Float);
        assert_eq!(ds.column("label").unwrap().dtype(), ColumnType::Text);
        assert_eq!(ds.column("flag").unwrap().dtype(), ColumnType::Boolean);

        assert_eq!(ds.column("id").unwrap().cells()[2], Cell::Absent);
        assert_eq!(ds.column("score").unwrap().cells()[1], Cell::Absent);
        assert_eq!(ds.column("label").unwrap().cells()[1], Cell::Absent);
    }

    #[test]
    fn test_to_dataframe_preserves_nulls() {
        let ds = Dataset::new(vec![
            DataColumn::integer("n", vec![Some(4), None]),
            DataColumn::text("t", vec![None, Some("x")]),
        ])
        .unwrap();

        let df = ds.to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("n").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("n").unwrap().null_count(), 1);
        assert_eq!(df.column("t").unwrap().null_count(), 1);
    }

    #[test]
    fn test_round_trip_through_dataframe() {
        let ds = Dataset::new(vec![
            DataColumn::float("x", vec![Some(0.5), None]),
            DataColumn::boolean("b", vec![Some(true), None]),
        ])
        .unwrap();

        let back = Dataset::from_dataframe(&ds.to_dataframe().unwrap()).unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn test_duplicate_names_refused() {
        let ds = Dataset::new(vec![
            DataColumn::float("x", vec![Some(1.0)]),
            DataColumn::float("x", vec![Some(2.0)]),
        ])
        .unwrap();
        let err = ds.to_dataframe().unwrap_err();
        assert!(matches!(err, CleaningError::InvalidDataset(_)));
        assert!(err.to_string().contains("'x'"));
    }
}
