//! Summaries returned by cleaning operations.
//!
//! Every operation reports what it did so that a UI can show it and the
//! reporting module can record it.

use crate::dataset::{Cell, ColumnType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Schema
// ============================================================================

/// A column whose name changed during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// Two distinct original names that normalize to the same name.
///
/// Both columns are kept; resolving the clash (e.g. with
/// [`SchemaNormalizer::rename_column_at`](crate::cleaner::SchemaNormalizer::rename_column_at))
/// is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCollision {
    /// The shared normalized name.
    pub normalized: String,
    /// Original name of the earlier column.
    pub first: String,
    /// Original name of the later column.
    pub second: String,
}

/// Outcome of schema normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    pub renamed: Vec<ColumnRename>,
    pub collisions: Vec<NameCollision>,
}

impl SchemaReport {
    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }

    /// True when every name was already normalized.
    pub fn is_unchanged(&self) -> bool {
        self.renamed.is_empty()
    }
}

// ============================================================================
// Types
// ============================================================================

/// What the inference pass decided for one text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceOutcome {
    /// Converted to a numeric column of the given type.
    Converted(ColumnType),
    /// Numeric share at or below the threshold; stays text.
    KeptAsText,
}

impl fmt::Display for InferenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converted(dtype) => write!(f, "converted to {}", dtype),
            Self::KeptAsText => f.write_str("kept as text"),
        }
    }
}

/// Inference result for one text column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInference {
    pub column: String,
    /// Share of present values that parse as numbers (0.0 - 1.0).
    pub numeric_fraction: f64,
    pub outcome: InferenceOutcome,
    /// Present values that could not be parsed and became absent.
    pub values_discarded: usize,
}

/// Outcome of the automatic type inference pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeInferenceReport {
    /// One entry per column that was text before the pass.
    pub columns: Vec<ColumnInference>,
}

impl TypeInferenceReport {
    /// Names of the columns converted to a numeric type.
    pub fn converted_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| matches!(c.outcome, InferenceOutcome::Converted(_)))
            .map(|c| c.column.as_str())
            .collect()
    }
}

/// Outcome of an explicit column conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub column: String,
    pub from: ColumnType,
    pub to: ColumnType,
    /// Number of present values that were cast.
    pub values_converted: usize,
}

// ============================================================================
// Rows, columns and missing values
// ============================================================================

/// Row counts around a row-dropping operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDropSummary {
    pub rows_before: usize,
    pub rows_after: usize,
}

impl RowDropSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before - self.rows_after
    }

    /// Percentage of rows removed (0.0 - 100.0).
    pub fn removed_percentage(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            self.rows_removed() as f64 / self.rows_before as f64 * 100.0
        }
    }
}

/// Outcome of filling missing values in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillSummary {
    pub column: String,
    /// Human-readable strategy name.
    pub strategy: String,
    /// Value written into the gaps; `None` when no action was requested.
    pub fill_value: Option<Cell>,
    pub cells_filled: usize,
}

// ============================================================================
// Outliers
// ============================================================================

/// Quartiles and Tukey fences of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fences {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    /// A value is an outlier when it lies strictly outside the fences.
    #[inline]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Detection result for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub column: String,
    /// Number of present values the quartiles were computed from.
    pub present_values: usize,
    /// `None` when the column has no present values.
    pub fences: Option<Fences>,
    pub outlier_count: usize,
    /// Too few present values for meaningful quartiles.
    pub low_confidence: bool,
}

/// Detection results for a set of numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub columns: Vec<ColumnOutliers>,
}

impl OutlierReport {
    /// `(column, outlier_count)` pairs in column order.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.column.as_str(), c.outlier_count))
            .collect()
    }

    pub fn total_outliers(&self) -> usize {
        self.columns.iter().map(|c| c.outlier_count).sum()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnOutliers> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Outcome of replacing the outliers of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationSummary {
    pub column: String,
    /// Human-readable strategy name.
    pub strategy: String,
    /// Value written over the outliers; `None` when no action was requested.
    pub replacement: Option<f64>,
    pub replaced: usize,
    pub fences: Option<Fences>,
    pub low_confidence: bool,
}

// ============================================================================
// Profiling
// ============================================================================

/// Descriptive statistics of a numeric column's present values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// A distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: ColumnType,
    pub missing_count: usize,
    pub missing_percentage: f64,
    /// Distinct present values.
    pub unique_count: usize,
    /// Most frequent values, most frequent first.
    pub top_values: Vec<ValueCount>,
    /// First present values in row order, rendered as text.
    pub sample_values: Vec<String>,
    /// Only for numeric columns with at least one present value.
    pub numeric_summary: Option<NumericSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    /// `(rows, columns)`
    pub shape: (usize, usize),
    pub column_profiles: Vec<ColumnProfile>,
    pub missing_cells: usize,
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.column_profiles.iter().find(|c| c.name == name)
    }
}

/// Pairwise Pearson correlations between numeric columns.
///
/// Entries are `None` when fewer than two rows have both values present or
/// one side is constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

// ============================================================================
// Action log
// ============================================================================

/// A cleaning step that was applied to the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action_type: ActionType,
    /// Column name, or "dataset" for whole-dataset steps.
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ActionRecord {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Add details to the action.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Kinds of cleaning steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Column names were normalized.
    SchemaNormalized,
    /// A column was renamed.
    ColumnRenamed,
    /// One or more columns were removed.
    ColumnRemoved,
    /// Text columns were lowercased and numeric ones converted.
    TypesInferred,
    /// A column was cast to another type.
    TypeConverted,
    /// Missing values were filled.
    ValueImputed,
    /// Duplicate rows were removed.
    DuplicatesRemoved,
    /// Rows with missing values were removed.
    RowsRemoved,
    /// Outliers were replaced.
    OutlierHandled,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SchemaNormalized => "Schema Normalized",
            Self::ColumnRenamed => "Column Renamed",
            Self::ColumnRemoved => "Column Removed",
            Self::TypesInferred => "Types Inferred",
            Self::TypeConverted => "Type Converted",
            Self::ValueImputed => "Value Imputed",
            Self::DuplicatesRemoved => "Duplicates Removed",
            Self::RowsRemoved => "Rows Removed",
            Self::OutlierHandled => "Outlier Handled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_drop_summary() {
        let summary = RowDropSummary {
            rows_before: 4,
            rows_after: 3,
        };
        assert_eq!(summary.rows_removed(), 1);
        assert_eq!(summary.removed_percentage(), 25.0);

        let empty = RowDropSummary {
            rows_before: 0,
            rows_after: 0,
        };
        assert_eq!(empty.removed_percentage(), 0.0);
    }

    #[test]
    fn test_fences_are_strict() {
        let fences = Fences {
            q1: 2.25,
            q3: 4.75,
            iqr: 2.5,
            lower: -1.5,
            upper: 8.5,
        };
        assert!(!fences.is_outlier(8.5));
        assert!(!fences.is_outlier(-1.5));
        assert!(fences.is_outlier(8.51));
        assert!(fences.is_outlier(-2.0));
    }

    #[test]
    fn test_outlier_report_counts() {
        let report = OutlierReport {
            columns: vec![
                ColumnOutliers {
                    column: "a".to_string(),
                    present_values: 6,
                    fences: None,
                    outlier_count: 2,
                    low_confidence: false,
                },
                ColumnOutliers {
                    column: "b".to_string(),
                    present_values: 3,
                    fences: None,
                    outlier_count: 0,
                    low_confidence: true,
                },
            ],
        };
        assert_eq!(report.counts(), vec![("a", 2), ("b", 0)]);
        assert_eq!(report.total_outliers(), 2);
        assert!(report.get("b").unwrap().low_confidence);
    }

    #[test]
    fn test_action_record_serialization() {
        let action = ActionRecord::new(ActionType::ValueImputed, "age", "Filled 3 values")
            .with_details("median");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action_type"], "value_imputed");
        assert_eq!(json["details"], "median");
        assert_eq!(ActionType::ValueImputed.display_name(), "Value Imputed");
    }
}
