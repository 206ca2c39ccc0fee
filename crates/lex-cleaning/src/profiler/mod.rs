//! Data profiling module for dataset inspection.
//!
//! This module provides functionality for:
//! - Per-column summaries (type, missing values, distinct values, samples)
//! - Descriptive statistics for numeric columns
//! - Duplicate row counts
//! - Row previews and pairwise correlations

pub mod statistics;

use crate::dataset::{Cell, Column, Dataset};
use crate::types::{
    ColumnProfile, CorrelationMatrix, DatasetProfile, NumericSummary, ValueCount,
};
use std::collections::HashSet;

/// Number of most frequent values kept per column.
const TOP_VALUES: usize = 5;

/// Number of example values kept per column.
const SAMPLE_VALUES: usize = 5;

/// Data profiler for analyzing dataset structure and content.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset.
    pub fn profile_dataset(dataset: &Dataset) -> DatasetProfile {
        let height = dataset.height();
        let column_profiles = dataset
            .columns()
            .iter()
            .map(|column| Self::profile_column(column, height))
            .collect();

        let duplicate_count = dataset
            .first_occurrence_mask()
            .iter()
            .filter(|&&first| !first)
            .count();

        DatasetProfile {
            shape: dataset.shape(),
            column_profiles,
            missing_cells: dataset.missing_count(),
            duplicate_count,
            duplicate_percentage: percentage(duplicate_count, height),
        }
    }

    /// Descriptive statistics of a numeric column; `None` for other types or
    /// when no value is present.
    pub fn numeric_summary(column: &Column) -> Option<NumericSummary> {
        if !column.dtype().is_numeric() {
            return None;
        }
        let sorted = statistics::sorted_copy(&column.present_numbers());

        Some(NumericSummary {
            count: sorted.len(),
            mean: statistics::mean(&sorted)?,
            std: statistics::std_dev(&sorted),
            min: *sorted.first()?,
            q1: statistics::quantile_sorted(&sorted, 0.25)?,
            median: statistics::quantile_sorted(&sorted, 0.5)?,
            q3: statistics::quantile_sorted(&sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }

    /// Copy of the first `n` rows.
    pub fn preview(dataset: &Dataset, n: usize) -> Dataset {
        let mut head = dataset.clone();
        let keep: Vec<bool> = (0..dataset.height()).map(|row| row < n).collect();
        head.retain_rows(&keep);
        head
    }

    /// Pearson correlation between every pair of numeric columns.
    ///
    /// Each pair uses only the rows where both values are present.
    pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
        let numeric: Vec<&Column> = dataset
            .columns()
            .iter()
            .filter(|c| c.dtype().is_numeric())
            .collect();

        let values = numeric
            .iter()
            .map(|a| {
                numeric
                    .iter()
                    .map(|b| {
                        let (xs, ys): (Vec<f64>, Vec<f64>) = a
                            .cells()
                            .iter()
                            .zip(b.cells())
                            .filter_map(|(x, y)| Some((x.as_number()?, y.as_number()?)))
                            .unzip();
                        statistics::pearson(&xs, &ys)
                    })
                    .collect()
            })
            .collect();

        CorrelationMatrix {
            columns: numeric.iter().map(|c| c.name().to_string()).collect(),
            values,
        }
    }

    fn profile_column(column: &Column, height: usize) -> ColumnProfile {
        let missing_count = column.missing_count();

        let unique_count = column
            .cells()
            .iter()
            .filter(|cell| !cell.is_absent())
            .map(Cell::key)
            .collect::<HashSet<_>>()
            .len();

        let rendered: Vec<String> = column.cells().iter().filter_map(Cell::render).collect();
        let as_str: Vec<&str> = rendered.iter().map(String::as_str).collect();
        let top_values = statistics::value_counts(&as_str)
            .into_iter()
            .take(TOP_VALUES)
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect();

        ColumnProfile {
            name: column.name().to_string(),
            dtype: column.dtype(),
            missing_count,
            missing_percentage: percentage(missing_count, height),
            unique_count,
            top_values,
            sample_values: rendered.iter().take(SAMPLE_VALUES).cloned().collect(),
            numeric_summary: Self::numeric_summary(column),
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnType;
    use pretty_assertions::assert_eq;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::integer("x", vec![Some(1), Some(2), Some(3), Some(4), Some(1)]),
            Column::float("y", vec![Some(2.0), Some(4.0), Some(6.0), None, Some(2.0)]),
            Column::text("t", vec![Some("b"), Some("a"), Some("b"), None, Some("b")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_profile_dataset() {
        let profile = DataProfiler::profile_dataset(&sample());

        assert_eq!(profile.shape, (5, 3));
        assert_eq!(profile.missing_cells, 2);
        assert_eq!(profile.duplicate_count, 1);
        assert_eq!(profile.duplicate_percentage, 20.0);

        let t = profile.column("t").unwrap();
        assert_eq!(t.dtype, ColumnType::Text);
        assert_eq!(t.missing_count, 1);
        assert_eq!(t.unique_count, 2);
        assert_eq!(
            t.top_values,
            vec![
                ValueCount { value: "b".to_string(), count: 3 },
                ValueCount { value: "a".to_string(), count: 1 },
            ]
        );
        assert_eq!(t.sample_values, vec!["b", "a", "b", "b"]);
        assert_eq!(t.numeric_summary, None);
    }

    #[test]
    fn test_numeric_summary() {
        let dataset = sample();
        let summary = DataProfiler::numeric_summary(dataset.column("x").unwrap()).unwrap();

        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 2.2);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 1.0);
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.q3, 3.0);
        assert_eq!(summary.max, 4.0);
        assert!(summary.std.is_some());
    }

    #[test]
    fn test_numeric_summary_empty_column() {
        let column = Column::float("none", vec![None, None]);
        assert_eq!(DataProfiler::numeric_summary(&column), None);
    }

    #[test]
    fn test_preview() {
        let head = DataProfiler::preview(&sample(), 2);
        assert_eq!(head.shape(), (2, 3));
        assert_eq!(head.column("x").unwrap().present_numbers(), vec![1.0, 2.0]);

        let all = DataProfiler::preview(&sample(), 100);
        assert_eq!(all.height(), 5);
    }

    #[test]
    fn test_correlation_matrix_uses_complete_pairs() {
        let matrix = DataProfiler::correlation_matrix(&sample());
        assert_eq!(matrix.columns, vec!["x", "y"]);

        // rows 0, 1, 2, 4: y = 2x exactly
        let xy = matrix.get("x", "y").unwrap();
        assert!((xy - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get("x", "t"), None);
    }
}
