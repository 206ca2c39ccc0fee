//! Report generation module.
//!
//! A [`CleaningReport`] summarizes a cleaning session: the steps applied (in
//! order, with timestamps), warnings, the final dataset profile and the
//! outlier counts left in the data. It is used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_cleaning::reporting::{ReportGenerator, ReportParams};
//!
//! let report = ReportGenerator::build_report(ReportParams {
//!     input_file: "data/sales.csv",
//!     output_file: Some("outputs/sales_cleaned.csv"),
//!     engine: &engine,
//!     original_shape,
//!     dataset: &dataset,
//!     warnings: &warnings,
//! });
//!
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"));
//! generator.write_report_to_file(&report, "sales")?;
//! ```

mod generator;

pub use generator::{CleaningReport, ReportGenerator, ReportParams};
