//! Outlier handling module.
//!
//! Detects outliers in numeric columns with Tukey fences around the
//! interquartile range and replaces them with a statistic or a constant.
//! The outlier mask is recomputed from the current data on every call.

use crate::config::{CleaningConfig, OutlierStrategy};
use crate::dataset::{Cell, Column, ColumnType, Dataset};
use crate::error::{CleaningError, Result};
use crate::profiler::statistics;
use crate::types::{ColumnOutliers, Fences, OutlierReport, RemediationSummary};
use crate::utils::is_integral;
use tracing::{debug, warn};

/// Handles outlier detection and treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Quartiles and fences of the given present values.
    ///
    /// Returns `None` for an empty slice.
    pub fn compute_fences(values: &[f64], multiplier: f64) -> Option<Fences> {
        let sorted = statistics::sorted_copy(values);
        let q1 = statistics::quantile_sorted(&sorted, 0.25)?;
        let q3 = statistics::quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Fences {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// One flag per row; absent cells are never outliers.
    pub fn outlier_mask(column: &Column, fences: &Fences) -> Vec<bool> {
        column
            .cells()
            .iter()
            .map(|cell| cell.as_number().is_some_and(|v| fences.is_outlier(v)))
            .collect()
    }

    /// Count outliers per numeric column.
    ///
    /// An empty `columns` slice selects every numeric column.
    pub fn detect_outliers(
        dataset: &Dataset,
        columns: &[&str],
        config: &CleaningConfig,
    ) -> Result<OutlierReport> {
        let selected: Vec<&Column> = if columns.is_empty() {
            dataset
                .columns()
                .iter()
                .filter(|c| c.dtype().is_numeric())
                .collect()
        } else {
            columns
                .iter()
                .map(|name| {
                    let index = dataset.require_index(name)?;
                    let column = &dataset.columns()[index];
                    Self::require_numeric(column)?;
                    Ok(column)
                })
                .collect::<Result<_>>()?
        };

        if selected.is_empty() {
            return Err(CleaningError::NoApplicableColumns(
                "dataset has no numeric columns".to_string(),
            ));
        }

        let report = OutlierReport {
            columns: selected
                .into_iter()
                .map(|column| Self::analyze(column, config).0)
                .collect(),
        };

        debug!(
            "Detected {} outliers across {} columns",
            report.total_outliers(),
            report.columns.len()
        );
        Ok(report)
    }

    /// Replace the outliers of one numeric column.
    ///
    /// Mean, median and mode are computed over all present values, outliers
    /// included, before anything is replaced. Only flagged cells change.
    pub fn remediate_outliers(
        dataset: &mut Dataset,
        column: &str,
        strategy: OutlierStrategy,
        config: &CleaningConfig,
    ) -> Result<RemediationSummary> {
        let index = dataset.require_index(column)?;
        let target = &dataset.columns()[index];
        Self::require_numeric(target)?;

        let (analysis, mask) = Self::analyze(target, config);
        let replacement = Self::replacement_value(target, strategy)?;

        let mut summary = RemediationSummary {
            column: column.to_string(),
            strategy: strategy.display_name(),
            replacement,
            replaced: 0,
            fences: analysis.fences,
            low_confidence: analysis.low_confidence,
        };

        let Some(value) = replacement else {
            return Ok(summary);
        };

        if analysis.outlier_count > 0 {
            let cells: Vec<Cell> = target
                .cells()
                .iter()
                .zip(&mask)
                .map(|(cell, &flagged)| {
                    if flagged {
                        Cell::Number(value)
                    } else {
                        cell.clone()
                    }
                })
                .collect();
            let dtype = match target.dtype() {
                ColumnType::Integer if !is_integral(value) => ColumnType::Float,
                other => other,
            };
            dataset.column_at_mut(index).replace_contents(dtype, cells);
            summary.replaced = analysis.outlier_count;
        }

        debug!(
            "Replaced {} outliers in '{}' with {} ({})",
            summary.replaced, column, value, summary.strategy
        );
        Ok(summary)
    }

    fn require_numeric(column: &Column) -> Result<()> {
        if column.dtype().is_numeric() {
            Ok(())
        } else {
            Err(CleaningError::IncompatibleColumn {
                column: column.name().to_string(),
                expected: "numeric".to_string(),
                found: column.dtype().name().to_string(),
            })
        }
    }

    fn analyze(column: &Column, config: &CleaningConfig) -> (ColumnOutliers, Vec<bool>) {
        let values = column.present_numbers();
        let fences = Self::compute_fences(&values, config.iqr_multiplier);
        let mask = match &fences {
            Some(fences) => Self::outlier_mask(column, fences),
            None => vec![false; column.len()],
        };
        let outlier_count = mask.iter().filter(|&&flagged| flagged).count();
        let low_confidence = values.len() < config.min_quartile_support;

        if low_confidence {
            warn!(
                "Column '{}' has only {} present values; quartiles are unreliable",
                column.name(),
                values.len()
            );
        }

        (
            ColumnOutliers {
                column: column.name().to_string(),
                present_values: values.len(),
                fences,
                outlier_count,
                low_confidence,
            },
            mask,
        )
    }

    fn replacement_value(column: &Column, strategy: OutlierStrategy) -> Result<Option<f64>> {
        let undefined = |statistic: &str| CleaningError::UndefinedStatistic {
            column: column.name().to_string(),
            statistic: statistic.to_string(),
        };

        match strategy {
            OutlierStrategy::NoAction => Ok(None),
            OutlierStrategy::Mean => statistics::mean(&column.present_numbers())
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| undefined("mean")),
            OutlierStrategy::Median => statistics::median(&column.present_numbers())
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| undefined("median")),
            OutlierStrategy::Mode => statistics::numeric_mode(&column.present_numbers())
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| undefined("mode")),
            OutlierStrategy::Custom(value) if !value.is_finite() => {
                Err(CleaningError::InvalidUserInput {
                    column: column.name().to_string(),
                    reason: format!("replacement must be a finite number, got {}", value),
                })
            }
            OutlierStrategy::Custom(value) => Ok(Some(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    fn skewed() -> Dataset {
        Dataset::new(vec![
            Column::integer("v", vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(100)]),
            Column::text("label", vec![Some("a"); 6]),
        ])
        .unwrap()
    }

    #[test]
    fn test_compute_fences() {
        let fences =
            OutlierHandler::compute_fences(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5).unwrap();
        assert!(approx(fences.q1, 2.25));
        assert!(approx(fences.q3, 4.75));
        assert!(approx(fences.lower, -1.5));
        assert!(approx(fences.upper, 8.5));
        assert_eq!(OutlierHandler::compute_fences(&[], 1.5), None);
    }

    #[test]
    fn test_detect_outliers_all_numeric_columns() {
        let dataset = skewed();
        let report =
            OutlierHandler::detect_outliers(&dataset, &[], &CleaningConfig::default()).unwrap();

        assert_eq!(report.counts(), vec![("v", 1)]);
        let column = report.get("v").unwrap();
        assert_eq!(column.present_values, 6);
        assert!(!column.low_confidence);
    }

    #[test]
    fn test_detect_outliers_absent_never_flagged() {
        let dataset = Dataset::new(vec![Column::float(
            "f",
            vec![Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(50.0)],
        )])
        .unwrap();
        let column = dataset.column("f").unwrap();
        let fences = OutlierHandler::compute_fences(&column.present_numbers(), 1.5).unwrap();
        let mask = OutlierHandler::outlier_mask(column, &fences);
        assert_eq!(mask, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn test_detect_outliers_errors() {
        let dataset = skewed();
        let config = CleaningConfig::default();

        let err = OutlierHandler::detect_outliers(&dataset, &["label"], &config).unwrap_err();
        assert!(matches!(err, CleaningError::IncompatibleColumn { .. }));

        let err = OutlierHandler::detect_outliers(&dataset, &["ghost"], &config).unwrap_err();
        assert!(matches!(err, CleaningError::ColumnNotFound(_)));

        let text_only = Dataset::new(vec![Column::text("t", vec![Some("x")])]).unwrap();
        let err = OutlierHandler::detect_outliers(&text_only, &[], &config).unwrap_err();
        assert!(matches!(err, CleaningError::NoApplicableColumns(_)));
    }

    #[test]
    fn test_low_confidence_and_empty_columns() {
        let dataset = Dataset::new(vec![
            Column::float("few", vec![Some(1.0), Some(2.0), Some(3.0), None]),
            Column::float("none", vec![None, None, None, None]),
        ])
        .unwrap();
        let report =
            OutlierHandler::detect_outliers(&dataset, &[], &CleaningConfig::default()).unwrap();

        assert!(report.get("few").unwrap().low_confidence);
        let none = report.get("none").unwrap();
        assert_eq!(none.fences, None);
        assert_eq!(none.outlier_count, 0);
    }

    #[test]
    fn test_remediate_with_mean_replaces_only_outliers() {
        let mut dataset = skewed();
        let summary = OutlierHandler::remediate_outliers(
            &mut dataset,
            "v",
            OutlierStrategy::Mean,
            &CleaningConfig::default(),
        )
        .unwrap();

        assert_eq!(summary.replaced, 1);
        assert!(approx(summary.replacement.unwrap(), 19.1667));

        let column = dataset.column("v").unwrap();
        assert_eq!(column.dtype(), ColumnType::Float);
        assert_eq!(&column.present_numbers()[..5], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(approx(column.present_numbers()[5], 19.1667));
    }

    #[test]
    fn test_remediate_infinite_mean_is_undefined() {
        let mut dataset = Dataset::new(vec![Column::float(
            "v",
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(f64::INFINITY)],
        )])
        .unwrap();
        let before = dataset.clone();

        let err = OutlierHandler::remediate_outliers(
            &mut dataset,
            "v",
            OutlierStrategy::Mean,
            &CleaningConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CleaningError::UndefinedStatistic { .. }));
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_remediate_with_median_keeps_integer_type() {
        let mut dataset = Dataset::new(vec![Column::integer(
            "v",
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(100), Some(3)],
        )])
        .unwrap();
        OutlierHandler::remediate_outliers(
            &mut dataset,
            "v",
            OutlierStrategy::Median,
            &CleaningConfig::default(),
        )
        .unwrap();

        let column = dataset.column("v").unwrap();
        assert_eq!(column.dtype(), ColumnType::Integer);
        assert_eq!(column.cells()[5], Cell::Number(3.0));
    }

    #[test]
    fn test_remediate_custom_zero_allowed() {
        let mut dataset = skewed();
        let summary = OutlierHandler::remediate_outliers(
            &mut dataset,
            "v",
            OutlierStrategy::Custom(0.0),
            &CleaningConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.replaced, 1);
        assert_eq!(dataset.column("v").unwrap().cells()[5], Cell::Number(0.0));
    }

    #[test]
    fn test_remediate_rejects_bad_input() {
        let mut dataset = skewed();
        let before = dataset.clone();
        let config = CleaningConfig::default();

        let err = OutlierHandler::remediate_outliers(
            &mut dataset,
            "v",
            OutlierStrategy::Custom(f64::NAN),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, CleaningError::InvalidUserInput { .. }));

        let err =
            OutlierHandler::remediate_outliers(&mut dataset, "label", OutlierStrategy::Mean, &config)
                .unwrap_err();
        assert!(matches!(err, CleaningError::IncompatibleColumn { .. }));

        assert_eq!(dataset, before);
    }

    #[test]
    fn test_remediate_no_action() {
        let mut dataset = skewed();
        let before = dataset.clone();
        let summary = OutlierHandler::remediate_outliers(
            &mut dataset,
            "v",
            OutlierStrategy::NoAction,
            &CleaningConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.replaced, 0);
        assert_eq!(summary.replacement, None);
        assert_eq!(dataset, before);
    }
}
