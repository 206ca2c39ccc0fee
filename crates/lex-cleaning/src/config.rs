//! Configuration for the cleaning engine.
//!
//! This module provides the tunable constants of the engine using the
//! builder pattern.

use serde::{Deserialize, Serialize};

/// Default fraction of numeric-parseable values above which a text column
/// becomes numeric.
pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.7;

/// Default Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Default number of present values below which quartiles are low-confidence.
pub const DEFAULT_MIN_QUARTILE_SUPPORT: usize = 4;

/// Strategy for filling missing values in a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum NumericFill {
    /// Leave missing values as they are
    #[default]
    NoAction,
    /// Use the mean of present values
    Mean,
    /// Use the median of present values
    Median,
    /// Use the most frequent present value (smallest on ties)
    Mode,
    /// Use a caller-supplied value; zero means "nothing entered" and is refused
    Value(f64),
}

/// Strategy for filling missing values in a text column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum TextFill {
    /// Leave missing values as they are
    #[default]
    NoAction,
    /// Use the most frequent present value (lexicographically smallest on ties)
    MostFrequent,
    /// Use a caller-supplied value; blank input is refused
    Value(String),
}

/// A fill strategy, tagged with the kind of column it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "strategy", rename_all = "snake_case")]
pub enum FillStrategy {
    Numeric(NumericFill),
    Text(TextFill),
}

impl FillStrategy {
    /// Human-readable name of the strategy.
    pub fn display_name(&self) -> String {
        match self {
            Self::Numeric(NumericFill::NoAction) | Self::Text(TextFill::NoAction) => {
                "no action".to_string()
            }
            Self::Numeric(NumericFill::Mean) => "mean".to_string(),
            Self::Numeric(NumericFill::Median) => "median".to_string(),
            Self::Numeric(NumericFill::Mode) => "mode".to_string(),
            Self::Numeric(NumericFill::Value(v)) => format!("value {}", v),
            Self::Text(TextFill::MostFrequent) => "most frequent".to_string(),
            Self::Text(TextFill::Value(v)) => format!("value '{}'", v),
        }
    }
}

impl From<NumericFill> for FillStrategy {
    fn from(fill: NumericFill) -> Self {
        Self::Numeric(fill)
    }
}

impl From<TextFill> for FillStrategy {
    fn from(fill: TextFill) -> Self {
        Self::Text(fill)
    }
}

/// Replacement applied to cells flagged as outliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum OutlierStrategy {
    /// Keep outliers as-is
    #[default]
    NoAction,
    /// Replace with the mean of all present values
    Mean,
    /// Replace with the median of all present values
    Median,
    /// Replace with the most frequent present value
    Mode,
    /// Replace with a caller-supplied value
    Custom(f64),
}

impl OutlierStrategy {
    /// Human-readable name of the strategy.
    pub fn display_name(&self) -> String {
        match self {
            Self::NoAction => "no action".to_string(),
            Self::Mean => "mean".to_string(),
            Self::Median => "median".to_string(),
            Self::Mode => "mode".to_string(),
            Self::Custom(v) => format!("custom value {}", v),
        }
    }
}

/// Target of an explicit, user-triggered column conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Integer,
    Float,
    Text,
    Boolean,
}

impl TargetType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Boolean => "boolean",
        }
    }
}

/// Configuration for the cleaning engine.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .numeric_threshold(0.8)
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// A text column whose share of numeric-parseable present values is
    /// strictly above this threshold is converted to a numeric column.
    /// Default: 0.7 (70%)
    pub numeric_threshold: f64,

    /// Whether the type inference pass lowercases text values.
    /// Default: true
    pub lowercase_text: bool,

    /// Multiplier applied to the IQR to place the outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Minimum number of present values for quartiles to be considered reliable.
    /// Detection still runs below this count but is flagged low-confidence.
    /// Default: 4
    pub min_quartile_support: usize,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
            lowercase_text: true,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            min_quartile_support: DEFAULT_MIN_QUARTILE_SUPPORT,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.numeric_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "numeric_threshold".to_string(),
                value: self.numeric_threshold,
            });
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.min_quartile_support == 0 {
            return Err(ConfigValidationError::InvalidQuartileSupport(
                self.min_quartile_support,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid IQR multiplier: {0} (must be a finite number above 0)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid minimum quartile support: {0} (must be at least 1)")]
    InvalidQuartileSupport(usize),
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    numeric_threshold: Option<f64>,
    lowercase_text: Option<bool>,
    iqr_multiplier: Option<f64>,
    min_quartile_support: Option<usize>,
}

impl CleaningConfigBuilder {
    /// Set the numeric-fraction threshold for automatic type coercion.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.7 = 70%)
    pub fn numeric_threshold(mut self, threshold: f64) -> Self {
        self.numeric_threshold = Some(threshold);
        self
    }

    /// Enable or disable lowercasing of text values during type inference.
    pub fn lowercase_text(mut self, lowercase: bool) -> Self {
        self.lowercase_text = Some(lowercase);
        self
    }

    /// Set the fence multiplier for IQR outlier detection.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the present-value count below which quartiles are flagged.
    pub fn min_quartile_support(mut self, count: usize) -> Self {
        self.min_quartile_support = Some(count);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            numeric_threshold: self.numeric_threshold.unwrap_or(DEFAULT_NUMERIC_THRESHOLD),
            lowercase_text: self.lowercase_text.unwrap_or(true),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            min_quartile_support: self
                .min_quartile_support
                .unwrap_or(DEFAULT_MIN_QUARTILE_SUPPORT),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.numeric_threshold, 0.7);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.min_quartile_support, 4);
        assert!(config.lowercase_text);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = CleaningConfig::builder().build().unwrap();
        assert_eq!(config, CleaningConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .numeric_threshold(0.5)
            .lowercase_text(false)
            .iqr_multiplier(3.0)
            .min_quartile_support(8)
            .build()
            .unwrap();

        assert_eq!(config.numeric_threshold, 0.5);
        assert!(!config.lowercase_text);
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.min_quartile_support, 8);
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = CleaningConfig::builder().numeric_threshold(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_invalid_multiplier() {
        assert!(matches!(
            CleaningConfig::builder().iqr_multiplier(0.0).build(),
            Err(ConfigValidationError::InvalidIqrMultiplier(_))
        ));
        assert!(matches!(
            CleaningConfig::builder().iqr_multiplier(f64::NAN).build(),
            Err(ConfigValidationError::InvalidIqrMultiplier(_))
        ));
    }

    #[test]
    fn test_validation_invalid_support() {
        assert!(matches!(
            CleaningConfig::builder().min_quartile_support(0).build(),
            Err(ConfigValidationError::InvalidQuartileSupport(0))
        ));
    }

    #[test]
    fn test_strategy_display_names() {
        assert_eq!(FillStrategy::from(NumericFill::Median).display_name(), "median");
        assert_eq!(
            FillStrategy::from(TextFill::MostFrequent).display_name(),
            "most frequent"
        );
        assert_eq!(OutlierStrategy::Custom(2.5).display_name(), "custom value 2.5");
    }

    #[test]
    fn test_fill_strategy_from_json() {
        let json = r#"{"kind": "numeric", "strategy": {"method": "value", "value": 0.01}}"#;
        let strategy: FillStrategy = serde_json::from_str(json).expect("valid strategy json");
        assert_eq!(strategy, FillStrategy::Numeric(NumericFill::Value(0.01)));

        let json = r#"{"kind": "text", "strategy": {"method": "most_frequent"}}"#;
        let strategy: FillStrategy = serde_json::from_str(json).expect("valid strategy json");
        assert_eq!(strategy, FillStrategy::Text(TextFill::MostFrequent));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "numeric_threshold": 0.9,
            "lowercase_text": false,
            "iqr_multiplier": 2.0,
            "min_quartile_support": 10
        }"#;

        let config: CleaningConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.numeric_threshold, 0.9);
        assert!(!config.lowercase_text);
        assert_eq!(config.iqr_multiplier, 2.0);
        assert_eq!(config.min_quartile_support, 10);
    }
}
