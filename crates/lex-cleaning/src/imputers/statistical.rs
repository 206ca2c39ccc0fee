//! Statistical imputation methods.
//!
//! Provides mean, median, mode, and constant imputation for numeric and text
//! columns.

use crate::config::{FillStrategy, NumericFill, TextFill};
use crate::dataset::{Cell, Column, ColumnType, Dataset};
use crate::error::{CleaningError, Result};
use crate::profiler::statistics;
use crate::types::FillSummary;
use crate::utils::is_integral;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill the absent cells of one column.
    ///
    /// Numeric strategies need a numeric column and text strategies a text
    /// column; an `Unresolved` column accepts either and takes the strategy's
    /// type. Statistics are computed over present values only. Present cells
    /// never change.
    pub fn fill_missing(
        dataset: &mut Dataset,
        column: &str,
        strategy: &FillStrategy,
    ) -> Result<FillSummary> {
        let index = dataset.require_index(column)?;
        let target = &dataset.columns()[index];

        let fill = match strategy {
            FillStrategy::Numeric(fill) => {
                Self::check_kind(target, "numeric", ColumnType::is_numeric)?;
                Self::numeric_fill_value(target, *fill)?.map(|value| {
                    let dtype = match target.dtype() {
                        ColumnType::Integer if is_integral(value) => ColumnType::Integer,
                        _ => ColumnType::Float,
                    };
                    (Cell::Number(value), dtype)
                })
            }
            FillStrategy::Text(fill) => {
                Self::check_kind(target, "text", |dtype| *dtype == ColumnType::Text)?;
                Self::text_fill_value(target, fill)?
                    .map(|value| (Cell::Text(value), ColumnType::Text))
            }
        };

        let Some((value, dtype)) = fill else {
            debug!("No fill requested for '{}'", column);
            return Ok(FillSummary {
                column: column.to_string(),
                strategy: strategy.display_name(),
                fill_value: None,
                cells_filled: 0,
            });
        };

        let cells_filled = target.missing_count();
        if cells_filled > 0 {
            let cells: Vec<Cell> = target
                .cells()
                .iter()
                .map(|cell| {
                    if cell.is_absent() {
                        value.clone()
                    } else {
                        cell.clone()
                    }
                })
                .collect();
            dataset.column_at_mut(index).replace_contents(dtype, cells);
        }

        debug!(
            "Filled {} missing values in '{}' with {} ({})",
            cells_filled,
            column,
            value,
            strategy.display_name()
        );

        Ok(FillSummary {
            column: column.to_string(),
            strategy: strategy.display_name(),
            fill_value: Some(value),
            cells_filled,
        })
    }

    fn check_kind(
        column: &Column,
        expected: &str,
        accepts: impl Fn(&ColumnType) -> bool,
    ) -> Result<()> {
        let dtype = column.dtype();
        if dtype == ColumnType::Unresolved || accepts(&dtype) {
            Ok(())
        } else {
            Err(CleaningError::IncompatibleColumn {
                column: column.name().to_string(),
                expected: expected.to_string(),
                found: dtype.name().to_string(),
            })
        }
    }

    fn numeric_fill_value(column: &Column, fill: NumericFill) -> Result<Option<f64>> {
        let undefined = |statistic: &str| CleaningError::UndefinedStatistic {
            column: column.name().to_string(),
            statistic: statistic.to_string(),
        };

        match fill {
            NumericFill::NoAction => Ok(None),
            NumericFill::Mean => statistics::mean(&column.present_numbers())
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| undefined("mean")),
            NumericFill::Median => statistics::median(&column.present_numbers())
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| undefined("median")),
            NumericFill::Mode => statistics::numeric_mode(&column.present_numbers())
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| undefined("mode")),
            NumericFill::Value(value) if !value.is_finite() => {
                Err(CleaningError::InvalidUserInput {
                    column: column.name().to_string(),
                    reason: format!("fill value must be a finite number, got {}", value),
                })
            }
            // 0 is what an untouched numeric input holds, so it counts as no value
            NumericFill::Value(value) if value == 0.0 => Err(CleaningError::InvalidUserInput {
                column: column.name().to_string(),
                reason: "enter a non-zero fill value".to_string(),
            }),
            NumericFill::Value(value) => Ok(Some(value)),
        }
    }

    fn text_fill_value(column: &Column, fill: &TextFill) -> Result<Option<String>> {
        match fill {
            TextFill::NoAction => Ok(None),
            TextFill::MostFrequent => statistics::text_mode(&column.present_texts())
                .map(|value| Some(value.to_string()))
                .ok_or_else(|| CleaningError::UndefinedStatistic {
                    column: column.name().to_string(),
                    statistic: "most frequent value".to_string(),
                }),
            TextFill::Value(value) if value.trim().is_empty() => {
                Err(CleaningError::InvalidUserInput {
                    column: column.name().to_string(),
                    reason: "fill value cannot be blank".to_string(),
                })
            }
            TextFill::Value(value) => Ok(Some(value.clone())),
        }
    }
}
