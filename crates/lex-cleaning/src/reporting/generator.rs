use crate::dataset::Dataset;
use crate::engine::CleaningEngine;
use crate::error::Result;
use crate::types::{ActionRecord, DatasetProfile, OutlierReport};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Summary of a cleaning session, for CLI and library output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,
    /// Whether any step changed the dataset; export is only offered when set
    pub cleaned: bool,
    /// Shape before cleaning (rows, columns)
    pub original_shape: (usize, usize),
    /// Shape after cleaning (rows, columns)
    pub final_shape: (usize, usize),
    pub rows_removed: usize,
    pub columns_removed: usize,
    /// Steps applied, oldest first
    pub actions: Vec<ActionRecord>,
    /// Steps that were refused or failed
    pub warnings: Vec<String>,
    /// Outliers remaining in the numeric columns; `None` without numeric columns
    pub outliers: Option<OutlierReport>,
    /// Profile of the cleaned dataset
    pub final_profile: DatasetProfile,
}

impl CleaningReport {
    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }
}

/// Parameters for building a [`CleaningReport`].
pub struct ReportParams<'a> {
    pub input_file: &'a str,
    pub output_file: Option<&'a str>,
    pub engine: &'a CleaningEngine,
    pub original_shape: (usize, usize),
    /// The cleaned dataset
    pub dataset: &'a Dataset,
    pub warnings: &'a [String],
}

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Build a report from the session state.
    pub fn build_report(params: ReportParams<'_>) -> CleaningReport {
        let ReportParams {
            input_file,
            output_file,
            engine,
            original_shape,
            dataset,
            warnings,
        } = params;

        let final_shape = dataset.shape();
        let outliers = match engine.detect_outliers(dataset, &[]) {
            Ok(report) => Some(report),
            Err(e) => {
                debug!("No outlier summary: {}", e);
                None
            }
        };

        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            cleaned: engine.is_cleaned(),
            original_shape,
            final_shape,
            rows_removed: original_shape.0.saturating_sub(final_shape.0),
            columns_removed: original_shape.1.saturating_sub(final_shape.1),
            actions: engine.actions().to_vec(),
            warnings: warnings.to_vec(),
            outliers,
            final_profile: engine.profile(dataset),
        }
    }

    /// Write a report to a JSON file.
    ///
    /// The report is written to the output directory with the specified base name.
    /// For example, if `report_base_name` is "sales", the file will be "sales_report.json".
    pub fn write_report_to_file(
        &self,
        report: &CleaningReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
