//! Data cleaning module for preprocessing datasets.
//!
//! This module provides functionality for:
//! - Normalizing and renaming column names
//! - Inferring numeric columns and converting column types
//! - Removing duplicate rows and rows with missing values
//! - Dropping columns

mod converters;
mod schema;
mod type_corrector;

pub use schema::SchemaNormalizer;
pub use type_corrector::TypeCorrector;

use crate::dataset::Dataset;
use crate::error::{CleaningError, Result};
use crate::types::RowDropSummary;
use tracing::debug;

/// Row and column removal operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove rows identical in every column to an earlier row.
    ///
    /// The first occurrence is kept and row order is preserved. Absent cells
    /// compare equal to each other and to nothing else.
    pub fn drop_duplicates(&self, dataset: &mut Dataset) -> RowDropSummary {
        let rows_before = dataset.height();

        let keep = dataset.first_occurrence_mask();
        dataset.retain_rows(&keep);
        let summary = RowDropSummary {
            rows_before,
            rows_after: dataset.height(),
        };

        if summary.rows_removed() > 0 {
            debug!(
                "Removed {} duplicate rows ({:.1}%)",
                summary.rows_removed(),
                summary.removed_percentage()
            );
        } else {
            debug!("No duplicate rows found");
        }

        summary
    }

    /// Remove every row with at least one absent cell.
    pub fn drop_rows_with_missing(&self, dataset: &mut Dataset) -> RowDropSummary {
        let rows_before = dataset.height();

        let keep: Vec<bool> = (0..rows_before)
            .map(|row| {
                dataset
                    .columns()
                    .iter()
                    .all(|column| !column.cells()[row].is_absent())
            })
            .collect();

        dataset.retain_rows(&keep);
        let summary = RowDropSummary {
            rows_before,
            rows_after: dataset.height(),
        };

        debug!(
            "Removed {} rows with missing values ({:.1}%)",
            summary.rows_removed(),
            summary.removed_percentage()
        );
        summary
    }

    /// Remove the named columns, all or nothing.
    ///
    /// Every name must exist; otherwise nothing is removed and the first
    /// unknown name is reported. Returns the removed names in dataset order.
    pub fn drop_columns(&self, dataset: &mut Dataset, names: &[&str]) -> Result<Vec<String>> {
        if let Some(missing) = names.iter().find(|n| dataset.column_index(n).is_none()) {
            return Err(CleaningError::ColumnNotFound(missing.to_string()));
        }

        let mut indices: Vec<usize> = dataset
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| names.contains(&column.name()))
            .map(|(index, _)| index)
            .collect();
        indices.sort_unstable();

        let removed: Vec<String> = indices
            .iter()
            .map(|&index| dataset.columns()[index].name().to_string())
            .collect();

        dataset.remove_columns(&indices);
        debug!("Removed {} columns: {:?}", removed.len(), removed);

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Cell, Column};
    use pretty_assertions::assert_eq;

    fn people() -> Dataset {
        Dataset::new(vec![
            Column::text("name", vec![Some("ann"), Some("bob"), Some("ann"), None, None]),
            Column::integer("age", vec![Some(30), Some(41), Some(30), None, None]),
            Column::float("score", vec![Some(1.5), None, Some(1.5), Some(2.0), Some(2.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_duplicates_keeps_first() {
        let mut dataset = people();
        let summary = DataCleaner.drop_duplicates(&mut dataset);

        assert_eq!(summary.rows_before, 5);
        assert_eq!(summary.rows_after, 3);
        assert_eq!(
            dataset.column("name").unwrap().cells(),
            &[
                Cell::Text("ann".to_string()),
                Cell::Text("bob".to_string()),
                Cell::Absent
            ]
        );
    }

    #[test]
    fn test_drop_duplicates_is_idempotent() {
        let mut dataset = people();
        DataCleaner.drop_duplicates(&mut dataset);
        let once = dataset.clone();
        let summary = DataCleaner.drop_duplicates(&mut dataset);
        assert_eq!(summary.rows_removed(), 0);
        assert_eq!(dataset, once);
    }

    #[test]
    fn test_absent_differs_from_empty_text() {
        let mut dataset =
            Dataset::new(vec![Column::text("t", vec![Some(""), None, Some("")])]).unwrap();
        let summary = DataCleaner.drop_duplicates(&mut dataset);
        assert_eq!(summary.rows_after, 2);
    }

    #[test]
    fn test_drop_rows_with_missing() {
        let mut dataset = people();
        let summary = DataCleaner.drop_rows_with_missing(&mut dataset);

        assert_eq!(summary.rows_removed(), 3);
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.missing_count(), 0);
    }

    #[test]
    fn test_drop_rows_with_missing_on_empty_dataset() {
        let mut dataset = Dataset::empty();
        let summary = DataCleaner.drop_rows_with_missing(&mut dataset);
        assert_eq!(summary.rows_before, 0);
        assert_eq!(summary.rows_after, 0);
    }

    #[test]
    fn test_drop_columns() {
        let mut dataset = people();
        let removed = DataCleaner
            .drop_columns(&mut dataset, &["score", "name"])
            .unwrap();
        assert_eq!(removed, vec!["name".to_string(), "score".to_string()]);
        assert_eq!(dataset.column_names(), vec!["age"]);
        assert_eq!(dataset.height(), 5);
    }

    #[test]
    fn test_drop_columns_unknown_name_changes_nothing() {
        let mut dataset = people();
        let before = dataset.clone();
        let err = DataCleaner
            .drop_columns(&mut dataset, &["age", "ghost"])
            .unwrap_err();
        assert!(matches!(err, CleaningError::ColumnNotFound(name) if name == "ghost"));
        assert_eq!(dataset, before);
    }
}
