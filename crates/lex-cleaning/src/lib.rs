//! Data Cleaning Library
//!
//! A deterministic data-cleaning and outlier engine for tabular data, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! This library provides interactive cleaning operations over an in-memory
//! [`Dataset`]:
//!
//! - **Schema Normalization**: Canonical snake_case column names, renaming
//! - **Type Inference**: Lowercasing text and converting mostly-numeric text columns
//! - **Type Conversion**: All-or-nothing casts to integer, float, text or boolean
//! - **Missing Values**: Mean, median, mode, most-frequent or constant fills
//! - **Deduplication**: Removing repeated rows and rows with missing values
//! - **Outliers**: IQR fence detection and per-column replacement
//! - **Profiling**: Column summaries, descriptive statistics and correlations
//!
//! Every operation either applies completely or leaves the dataset unchanged.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_cleaning::{CleaningEngine, NumericFill, OutlierStrategy, TextFill};
//!
//! let mut dataset = lex_cleaning::io::read_csv("data.csv")?;
//! let mut engine = CleaningEngine::default();
//!
//! let schema = engine.normalize_schema(&mut dataset);
//! for collision in &schema.collisions {
//!     println!("'{}' and '{}' clash", collision.first, collision.second);
//! }
//!
//! engine.infer_and_coerce_types(&mut dataset);
//! engine.fill_missing(&mut dataset, "price", &NumericFill::Median.into())?;
//! engine.fill_missing(&mut dataset, "city", &TextFill::MostFrequent.into())?;
//! engine.drop_duplicates(&mut dataset);
//!
//! let outliers = engine.detect_outliers(&dataset, &[])?;
//! println!("{:?}", outliers.counts());
//! engine.remediate_outliers(&mut dataset, "price", OutlierStrategy::Median)?;
//!
//! lex_cleaning::io::write_csv(&dataset, "outputs/data_cleaned.csv")?;
//! ```
//!
//! # Configuration
//!
//! Use [`CleaningConfig`] to tune inference and detection:
//!
//! ```rust,ignore
//! use lex_cleaning::CleaningConfig;
//!
//! let config = CleaningConfig::builder()
//!     .numeric_threshold(0.7)      // Convert text columns with >70% numeric values
//!     .lowercase_text(true)
//!     .iqr_multiplier(1.5)         // Tukey fences at Q1 - 1.5 IQR, Q3 + 1.5 IQR
//!     .min_quartile_support(4)     // Fewer present values are flagged low-confidence
//!     .build()?;
//!
//! let engine = lex_cleaning::CleaningEngine::new(config)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod imputers;
pub mod io;
pub mod outliers;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, SchemaNormalizer, TypeCorrector};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, FillStrategy, NumericFill,
    OutlierStrategy, TargetType, TextFill,
};
pub use dataset::{Cell, Column, ColumnType, Dataset};
pub use engine::CleaningEngine;
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use outliers::OutlierHandler;
pub use profiler::DataProfiler;
pub use reporting::{CleaningReport, ReportGenerator, ReportParams};
pub use types::{
    ActionRecord, ActionType, ColumnInference, ColumnOutliers, ColumnProfile, ColumnRename,
    ConversionSummary, CorrelationMatrix, DatasetProfile, Fences, FillSummary, InferenceOutcome,
    NameCollision, NumericSummary, OutlierReport, RemediationSummary, RowDropSummary,
    SchemaReport, TypeInferenceReport, ValueCount,
};
