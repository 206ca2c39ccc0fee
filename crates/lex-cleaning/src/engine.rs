//! Engine facade tying the cleaning components together.
//!
//! [`CleaningEngine`] carries the configuration and keeps an ordered log of
//! every step that changed the dataset. The log drives the cleaning report
//! and the "dataset was cleaned" state.

use crate::cleaner::{DataCleaner, SchemaNormalizer, TypeCorrector};
use crate::config::{
    CleaningConfig, ConfigValidationError, FillStrategy, OutlierStrategy, TargetType,
};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::outliers::OutlierHandler;
use crate::profiler::DataProfiler;
use crate::types::{
    ActionRecord, ActionType, ColumnRename, ConversionSummary, DatasetProfile, FillSummary,
    OutlierReport, RemediationSummary, RowDropSummary, SchemaReport, TypeInferenceReport,
};
use tracing::info;

/// Runs cleaning operations and records what they did.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{CleaningEngine, NumericFill};
///
/// let mut engine = CleaningEngine::default();
/// let mut dataset = lex_cleaning::io::read_csv("data.csv")?;
///
/// engine.normalize_schema(&mut dataset);
/// engine.infer_and_coerce_types(&mut dataset);
/// engine.fill_missing(&mut dataset, "age", &NumericFill::Median.into())?;
/// assert!(engine.is_cleaned());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CleaningEngine {
    config: CleaningConfig,
    actions: Vec<ActionRecord>,
}

impl CleaningEngine {
    /// Create an engine with a validated configuration.
    pub fn new(config: CleaningConfig) -> std::result::Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            actions: Vec::new(),
        })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Steps applied so far, oldest first.
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// True once any step has changed the dataset.
    pub fn is_cleaned(&self) -> bool {
        !self.actions.is_empty()
    }

    fn record(&mut self, action: ActionRecord) {
        info!("{}: {}", action.action_type.display_name(), action.description);
        self.actions.push(action);
    }

    // ------------------------------------------------------------------------
    // Schema
    // ------------------------------------------------------------------------

    pub fn normalize_schema(&mut self, dataset: &mut Dataset) -> SchemaReport {
        let report = SchemaNormalizer::normalize_schema(dataset);
        if !report.is_unchanged() {
            self.record(
                ActionRecord::new(
                    ActionType::SchemaNormalized,
                    "dataset",
                    format!("Normalized {} column names", report.renamed.len()),
                )
                .with_details(
                    report
                        .renamed
                        .iter()
                        .map(|r| format!("{} -> {}", r.from, r.to))
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            );
        }
        report
    }

    pub fn rename_column(
        &mut self,
        dataset: &mut Dataset,
        from: &str,
        to: &str,
    ) -> Result<ColumnRename> {
        let rename = SchemaNormalizer::rename_column(dataset, from, to)?;
        if rename.from != rename.to {
            self.record(ActionRecord::new(
                ActionType::ColumnRenamed,
                &rename.to,
                format!("Renamed '{}' to '{}'", rename.from, rename.to),
            ));
        }
        Ok(rename)
    }

    pub fn drop_columns(&mut self, dataset: &mut Dataset, names: &[&str]) -> Result<Vec<String>> {
        let removed = DataCleaner.drop_columns(dataset, names)?;
        if !removed.is_empty() {
            self.record(ActionRecord::new(
                ActionType::ColumnRemoved,
                removed.join(", "),
                format!("Removed {} columns", removed.len()),
            ));
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    pub fn infer_and_coerce_types(&mut self, dataset: &mut Dataset) -> TypeInferenceReport {
        let report = TypeCorrector.infer_and_coerce_types(dataset, &self.config);
        if !report.columns.is_empty() {
            let converted = report.converted_columns();
            let description = format!(
                "Processed {} text columns, converted {} to numeric",
                report.columns.len(),
                converted.len()
            );
            let details = converted.join(", ");
            self.record(
                ActionRecord::new(ActionType::TypesInferred, "dataset", description)
                    .with_details(details),
            );
        }
        report
    }

    pub fn convert_column_type(
        &mut self,
        dataset: &mut Dataset,
        column: &str,
        target: TargetType,
    ) -> Result<ConversionSummary> {
        let summary = TypeCorrector.convert_column_type(dataset, column, target)?;
        self.record(ActionRecord::new(
            ActionType::TypeConverted,
            column,
            format!("Converted from {} to {}", summary.from, summary.to),
        ));
        Ok(summary)
    }

    // ------------------------------------------------------------------------
    // Rows and missing values
    // ------------------------------------------------------------------------

    pub fn fill_missing(
        &mut self,
        dataset: &mut Dataset,
        column: &str,
        strategy: &FillStrategy,
    ) -> Result<FillSummary> {
        let summary = StatisticalImputer::fill_missing(dataset, column, strategy)?;
        if let Some(value) = &summary.fill_value {
            self.record(
                ActionRecord::new(
                    ActionType::ValueImputed,
                    column,
                    format!("Filled {} missing values with {}", summary.cells_filled, value),
                )
                .with_details(summary.strategy.clone()),
            );
        }
        Ok(summary)
    }

    pub fn drop_duplicates(&mut self, dataset: &mut Dataset) -> RowDropSummary {
        let summary = DataCleaner.drop_duplicates(dataset);
        self.record(ActionRecord::new(
            ActionType::DuplicatesRemoved,
            "dataset",
            format!(
                "Removed {} duplicate rows ({:.1}%)",
                summary.rows_removed(),
                summary.removed_percentage()
            ),
        ));
        summary
    }

    pub fn drop_rows_with_missing(&mut self, dataset: &mut Dataset) -> RowDropSummary {
        let summary = DataCleaner.drop_rows_with_missing(dataset);
        self.record(ActionRecord::new(
            ActionType::RowsRemoved,
            "dataset",
            format!(
                "Removed {} rows with missing values ({:.1}%)",
                summary.rows_removed(),
                summary.removed_percentage()
            ),
        ));
        summary
    }

    // ------------------------------------------------------------------------
    // Outliers
    // ------------------------------------------------------------------------

    /// Read-only; nothing is recorded.
    pub fn detect_outliers(&self, dataset: &Dataset, columns: &[&str]) -> Result<OutlierReport> {
        OutlierHandler::detect_outliers(dataset, columns, &self.config)
    }

    pub fn remediate_outliers(
        &mut self,
        dataset: &mut Dataset,
        column: &str,
        strategy: OutlierStrategy,
    ) -> Result<RemediationSummary> {
        let summary = OutlierHandler::remediate_outliers(dataset, column, strategy, &self.config)?;
        if let Some(value) = summary.replacement {
            self.record(
                ActionRecord::new(
                    ActionType::OutlierHandled,
                    column,
                    format!("Replaced {} outliers with {}", summary.replaced, value),
                )
                .with_details(summary.strategy.clone()),
            );
        }
        Ok(summary)
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn profile(&self, dataset: &Dataset) -> DatasetProfile {
        DataProfiler::profile_dataset(dataset)
    }
}
