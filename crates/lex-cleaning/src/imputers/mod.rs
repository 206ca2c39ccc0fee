//! Imputation module for handling missing values.
//!
//! This module provides statistical imputation strategies (mean, median,
//! mode, most frequent) and caller-supplied constants.

mod statistical;

pub use statistical::StatisticalImputer;
