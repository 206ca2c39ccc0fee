//! Type inference for text columns and explicit column conversion.

use super::converters::{
    cast_cells, coerce_to_numeric, count_numeric_cells, lowercase_cells, target_column_type,
};
use crate::config::{CleaningConfig, TargetType};
use crate::dataset::{Cell, Column, ColumnType, Dataset};
use crate::error::{CleaningError, Result};
use crate::types::{ColumnInference, ConversionSummary, InferenceOutcome, TypeInferenceReport};
use tracing::{debug, info};

/// Converts columns to the types their values support.
pub struct TypeCorrector;

/// What the inference pass would write back for one column.
struct InferencePlan {
    inference: ColumnInference,
    dtype: ColumnType,
    cells: Vec<Cell>,
}

impl TypeCorrector {
    /// Lowercase text columns and convert the mostly-numeric ones.
    ///
    /// For every text column: values are lowercased (when enabled), then the
    /// share of present values that parse as numbers is measured. Strictly
    /// above `config.numeric_threshold` the column becomes numeric and
    /// unparseable values become absent. Columns of other types are untouched.
    pub fn infer_and_coerce_types(
        &self,
        dataset: &mut Dataset,
        config: &CleaningConfig,
    ) -> TypeInferenceReport {
        debug!("Analyzing text columns for numeric content...");
        let mut report = TypeInferenceReport::default();

        for index in 0..dataset.width() {
            let Some(plan) = Self::plan_column(&dataset.columns()[index], config) else {
                continue;
            };

            if let InferenceOutcome::Converted(dtype) = plan.inference.outcome {
                info!(
                    "Converted '{}' to {} ({:.0}% numeric, {} values discarded)",
                    plan.inference.column,
                    dtype,
                    plan.inference.numeric_fraction * 100.0,
                    plan.inference.values_discarded
                );
            }

            dataset
                .column_at_mut(index)
                .replace_contents(plan.dtype, plan.cells);
            report.columns.push(plan.inference);
        }

        report
    }

    /// Report what [`infer_and_coerce_types`](Self::infer_and_coerce_types)
    /// would do, without changing the dataset.
    pub fn detect_numeric_candidates(
        &self,
        dataset: &Dataset,
        config: &CleaningConfig,
    ) -> Vec<ColumnInference> {
        dataset
            .columns()
            .iter()
            .filter_map(|column| Self::plan_column(column, config))
            .map(|plan| plan.inference)
            .collect()
    }

    /// Cast one column to `target`, all or nothing.
    ///
    /// Fails with [`CleaningError::TypeConversionFailed`] naming the first
    /// value that cannot be cast; the column is then left unchanged. Casting
    /// a missing value to integer fails.
    pub fn convert_column_type(
        &self,
        dataset: &mut Dataset,
        column: &str,
        target: TargetType,
    ) -> Result<ConversionSummary> {
        let index = dataset.require_index(column)?;
        let source = &dataset.columns()[index];
        let from = source.dtype();
        let values_converted = source.present_count();

        let cells =
            cast_cells(source.cells(), target).map_err(|failure| {
                CleaningError::TypeConversionFailed {
                    column: column.to_string(),
                    target_type: target.name().to_string(),
                    reason: format!(
                        "row {} value '{}': {}",
                        failure.row, failure.value, failure.reason
                    ),
                }
            })?;

        let to = target_column_type(target);
        dataset.column_at_mut(index).replace_contents(to, cells);
        debug!("Converted '{}' from {} to {}", column, from, to);

        Ok(ConversionSummary {
            column: column.to_string(),
            from,
            to,
            values_converted,
        })
    }

    fn plan_column(column: &Column, config: &CleaningConfig) -> Option<InferencePlan> {
        if column.dtype() != ColumnType::Text {
            return None;
        }

        let cells = if config.lowercase_text {
            lowercase_cells(column.cells())
        } else {
            column.cells().to_vec()
        };

        let (numeric, present) = count_numeric_cells(&cells);
        let numeric_fraction = if present == 0 {
            0.0
        } else {
            numeric as f64 / present as f64
        };

        if present > 0 && numeric_fraction > config.numeric_threshold {
            let (coerced, dtype, discarded) = coerce_to_numeric(&cells);
            Some(InferencePlan {
                inference: ColumnInference {
                    column: column.name().to_string(),
                    numeric_fraction,
                    outcome: InferenceOutcome::Converted(dtype),
                    values_discarded: discarded,
                },
                dtype,
                cells: coerced,
            })
        } else {
            Some(InferencePlan {
                inference: ColumnInference {
                    column: column.name().to_string(),
                    numeric_fraction,
                    outcome: InferenceOutcome::KeptAsText,
                    values_discarded: 0,
                },
                dtype: ColumnType::Text,
                cells,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn corrector() -> TypeCorrector {
        TypeCorrector
    }

    #[test]
    fn test_mostly_numeric_column_converted() {
        // 8 of 10 parse: 80% > 70%
        let values = vec![
            Some("1"), Some("2"), Some("3"), Some("4"), Some("5"),
            Some("6"), Some("7"), Some("8"), Some("n/a"), Some("unknown"),
        ];
        let mut dataset = Dataset::new(vec![Column::text("qty", values)]).unwrap();

        let report = corrector().infer_and_coerce_types(&mut dataset, &CleaningConfig::default());

        let column = dataset.column("qty").unwrap();
        assert_eq!(column.dtype(), ColumnType::Float);
        assert_eq!(column.missing_count(), 2);
        assert_eq!(column.cells()[0], Cell::Number(1.0));
        assert_eq!(report.converted_columns(), vec!["qty"]);
        assert_eq!(report.columns[0].values_discarded, 2);
    }

    #[test]
    fn test_fully_integral_column_becomes_integer() {
        let mut dataset =
            Dataset::new(vec![Column::text("id", vec![Some("10"), None, Some("12")])]).unwrap();
        corrector().infer_and_coerce_types(&mut dataset, &CleaningConfig::default());

        let column = dataset.column("id").unwrap();
        assert_eq!(column.dtype(), ColumnType::Integer);
        assert_eq!(column.cells()[1], Cell::Absent);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 7 of 10 parse: exactly 70% stays text
        let values = vec![
            Some("1"), Some("2"), Some("3"), Some("4"), Some("5"),
            Some("6"), Some("7"), Some("A"), Some("B"), Some("C"),
        ];
        let mut dataset = Dataset::new(vec![Column::text("code", values)]).unwrap();

        let report = corrector().infer_and_coerce_types(&mut dataset, &CleaningConfig::default());

        let column = dataset.column("code").unwrap();
        assert_eq!(column.dtype(), ColumnType::Text);
        assert_eq!(column.cells()[7], Cell::Text("a".to_string()));
        assert_eq!(report.columns[0].outcome, InferenceOutcome::KeptAsText);
        assert!((report.columns[0].numeric_fraction - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_lowercasing_can_be_disabled() {
        let mut dataset = Dataset::new(vec![Column::text("c", vec![Some("MiXeD")])]).unwrap();
        let config = CleaningConfig::builder().lowercase_text(false).build().unwrap();
        corrector().infer_and_coerce_types(&mut dataset, &config);
        assert_eq!(
            dataset.column("c").unwrap().cells()[0],
            Cell::Text("MiXeD".to_string())
        );
    }

    #[test]
    fn test_all_absent_text_column_stays_text() {
        let mut dataset = Dataset::new(vec![Column::text("empty", vec![None, None])]).unwrap();
        let report = corrector().infer_and_coerce_types(&mut dataset, &CleaningConfig::default());
        assert_eq!(dataset.column("empty").unwrap().dtype(), ColumnType::Text);
        assert_eq!(report.columns[0].numeric_fraction, 0.0);
    }

    #[test]
    fn test_non_text_columns_untouched() {
        let mut dataset = Dataset::new(vec![Column::float("x", vec![Some(1.5)])]).unwrap();
        let before = dataset.clone();
        let report = corrector().infer_and_coerce_types(&mut dataset, &CleaningConfig::default());
        assert!(report.columns.is_empty());
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_detect_numeric_candidates_does_not_mutate() {
        let dataset = Dataset::new(vec![Column::text("n", vec![Some("1"), Some("2")])]).unwrap();
        let candidates =
            corrector().detect_numeric_candidates(&dataset, &CleaningConfig::default());
        assert_eq!(
            candidates[0].outcome,
            InferenceOutcome::Converted(ColumnType::Integer)
        );
        assert_eq!(dataset.column("n").unwrap().dtype(), ColumnType::Text);
    }

    #[test]
    fn test_convert_column_type_success() {
        let mut dataset =
            Dataset::new(vec![Column::integer("n", vec![Some(1), Some(0), None])]).unwrap();
        let summary = corrector()
            .convert_column_type(&mut dataset, "n", TargetType::Boolean)
            .unwrap();

        assert_eq!(summary.from, ColumnType::Integer);
        assert_eq!(summary.to, ColumnType::Boolean);
        assert_eq!(summary.values_converted, 2);
        assert_eq!(
            dataset.column("n").unwrap().cells(),
            &[Cell::Bool(true), Cell::Bool(false), Cell::Absent]
        );
    }

    #[test]
    fn test_convert_column_type_is_all_or_nothing() {
        let mut dataset = Dataset::new(vec![Column::text(
            "mixed",
            vec![Some("1"), Some("abc"), Some("3")],
        )])
        .unwrap();
        let before = dataset.clone();

        let err = corrector()
            .convert_column_type(&mut dataset, "mixed", TargetType::Integer)
            .unwrap_err();

        assert!(matches!(err, CleaningError::TypeConversionFailed { .. }));
        assert!(err.to_string().contains("abc"));
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_convert_absent_to_integer_fails() {
        let mut dataset = Dataset::new(vec![Column::float("f", vec![Some(1.0), None])]).unwrap();
        let err = corrector()
            .convert_column_type(&mut dataset, "f", TargetType::Integer)
            .unwrap_err();
        assert!(matches!(err, CleaningError::TypeConversionFailed { .. }));
    }

    #[test]
    fn test_convert_unknown_column() {
        let mut dataset = Dataset::empty();
        let err = corrector()
            .convert_column_type(&mut dataset, "ghost", TargetType::Text)
            .unwrap_err();
        assert!(matches!(err, CleaningError::ColumnNotFound(_)));
    }
}
