//! Custom error types for the cleaning engine.
//!
//! Every engine operation is atomic: when it returns one of these errors the
//! dataset it was given is exactly as it was before the call.
//!
//! Errors are serializable so a frontend can render them from a `{code, message}`
//! pair.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for cleaning operations.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A cast could not be applied to every value of a column.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// A statistic has no finite value, usually because the column has no
    /// present values.
    #[error("Cannot compute {statistic} for column '{column}': no finite value")]
    UndefinedStatistic { column: String, statistic: String },

    /// The caller supplied a value the engine refuses to apply.
    #[error("Invalid input for column '{column}': {reason}")]
    InvalidUserInput { column: String, reason: String },

    /// An operation needs columns of a kind the dataset does not have.
    #[error("No applicable columns: {0}")]
    NoApplicableColumns(String),

    /// The column exists but has the wrong type for the operation.
    #[error("Column '{column}' is {found}, expected {expected}")]
    IncompatibleColumn {
        column: String,
        expected: String,
        found: String,
    },

    /// The dataset could not be built (ragged columns and similar).
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::UndefinedStatistic { .. } => "UNDEFINED_STATISTIC",
            Self::InvalidUserInput { .. } => "INVALID_USER_INPUT",
            Self::NoApplicableColumns(_) => "NO_APPLICABLE_COLUMNS",
            Self::IncompatibleColumn { .. } => "INCOMPATIBLE_COLUMN",
            Self::InvalidDataset(_) => "INVALID_DATASET",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a refusal of caller input rather than a data problem.
    ///
    /// The UI shows these as warnings.
    pub fn is_warning(&self) -> bool {
        match self {
            Self::InvalidUserInput { .. } => true,
            Self::WithContext { source, .. } => source.is_warning(),
            _ => false,
        }
    }

    /// Check if the session can continue with the same dataset after this error.
    ///
    /// Engine errors never touch the dataset; only loader failures leave the
    /// caller without one.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) | Self::Polars(_) | Self::Json(_) | Self::InvalidDataset(_) => false,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => true,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
