//! Configuration types for the cleaning pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use chrono::format::{Fixed, Item, Numeric, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Upper bound of the default cardinality threshold.
pub const DEFAULT_MAX_CATEGORIES: usize = 20;

/// Default cap on per-cell issues for missing dates in one column.
pub const DEFAULT_MISSING_DATE_REPORT_CAP: usize = 10;

/// Default placeholder for missing text and categorical cells.
pub const DEFAULT_FILL_PLACEHOLDER: &str = "Unknown";

/// Date formats tried, in order, when no formats are configured.
pub const DEFAULT_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_cleaner::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .dedup_key(["customer_id", "order_date"])
///     .cardinality_threshold(12)
///     .missing_date_report_cap(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Columns compared when detecting duplicate rows, by standardized name
    /// or by the original header of a renamed column.
    /// `None` compares every column.
    /// Default: None
    pub dedup_key: Option<Vec<String>>,

    /// Whether to remove duplicate rows at all.
    /// Default: true
    pub remove_duplicates: bool,

    /// Maximum number of distinct values for a column to be categorical.
    /// `None` uses min(20, ceil(rows / 2)).
    /// Default: None
    pub cardinality_threshold: Option<usize>,

    /// chrono format patterns tried in order when recognising dates.
    pub date_formats: Vec<String>,

    /// Missing dates in one column beyond this count are reported as a
    /// single summary issue instead of one issue per cell.
    /// Default: 10
    pub missing_date_report_cap: usize,

    /// Share of non-missing cells that must parse as a type for the type to
    /// be accepted (0.0 exclusive - 1.0). Cells that do not parse become
    /// missing and are reported.
    /// Default: 1.0 (every cell)
    pub type_agreement: f64,

    /// Value written into missing text and categorical cells.
    /// Default: "Unknown"
    pub fill_placeholder: String,

    /// Whether to trim surrounding whitespace from text cells before profiling.
    /// Default: false
    pub trim_text: bool,

    /// Whether empty text cells count as missing.
    /// Default: false
    pub blank_as_missing: bool,

    /// Columns the caller expects to be present and complete.
    /// Matched like `dedup_key`; an unmatched name is reported missing.
    /// Default: empty
    pub required_columns: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            dedup_key: None,
            remove_duplicates: true,
            cardinality_threshold: None,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            missing_date_report_cap: DEFAULT_MISSING_DATE_REPORT_CAP,
            type_agreement: 1.0,
            fill_placeholder: DEFAULT_FILL_PLACEHOLDER.to_string(),
            trim_text: false,
            blank_as_missing: false,
            required_columns: Vec::new(),
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
        if !(self.type_agreement > 0.0 && self.type_agreement <= 1.0) {
            return Err(ConfigValidationError::InvalidTypeAgreement(
                self.type_agreement,
            ));
        }

        if self.fill_placeholder.is_empty() {
            return Err(ConfigValidationError::EmptyPlaceholder);
        }

        if let Some(key) = &self.dedup_key
            && key.is_empty()
        {
            return Err(ConfigValidationError::EmptyDedupKey);
        }

        for pattern in &self.date_formats {
            validate_date_format(pattern)?;
        }

        Ok(())
    }

    /// Cardinality threshold for a dataset with `row_count` rows.
    pub fn effective_cardinality_threshold(&self, row_count: usize) -> usize {
        self.cardinality_threshold
            .unwrap_or_else(|| DEFAULT_MAX_CATEGORIES.min(row_count.div_ceil(2)))
    }
}

/// Check that a chrono pattern is well formed and names at least one date field.
fn validate_date_format(pattern: &str) -> Result<(), ConfigValidationError> {
    if pattern.trim().is_empty() {
        return Err(ConfigValidationError::InvalidDateFormat {
            pattern: pattern.to_string(),
            reason: "pattern is empty".to_string(),
        });
    }

    let mut has_date_field = false;
    for item in StrftimeItems::new(pattern) {
        match item {
            Item::Error => {
                return Err(ConfigValidationError::InvalidDateFormat {
                    pattern: pattern.to_string(),
                    reason: "unrecognized format specifier".to_string(),
                });
            }
            Item::Numeric(numeric, _) => {
                if matches!(
                    numeric,
                    Numeric::Year
                        | Numeric::YearMod100
                        | Numeric::IsoYear
                        | Numeric::Month
                        | Numeric::Day
                        | Numeric::Ordinal
                ) {
                    has_date_field = true;
                }
            }
            Item::Fixed(Fixed::ShortMonthName | Fixed::LongMonthName) => {
                has_date_field = true;
            }
            _ => {}
        }
    }

    if !has_date_field {
        return Err(ConfigValidationError::InvalidDateFormat {
            pattern: pattern.to_string(),
            reason: "pattern contains no date field".to_string(),
        });
    }

    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Malformed date format '{pattern}': {reason}")]
    InvalidDateFormat { pattern: String, reason: String },

    #[error("Invalid type agreement: {0} (must be greater than 0.0 and at most 1.0)")]
    InvalidTypeAgreement(f64),

    #[error("Fill placeholder must not be empty")]
    EmptyPlaceholder,

    #[error("Dedup key must name at least one column")]
    EmptyDedupKey,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    dedup_key: Option<Vec<String>>,
    remove_duplicates: Option<bool>,
    cardinality_threshold: Option<usize>,
    date_formats: Option<Vec<String>>,
    missing_date_report_cap: Option<usize>,
    type_agreement: Option<f64>,
    fill_placeholder: Option<String>,
    trim_text: Option<bool>,
    blank_as_missing: Option<bool>,
    required_columns: Option<Vec<String>>,
}

impl CleaningConfigBuilder {
    /// Set the columns compared when detecting duplicates.
    ///
    /// The key is resolved after renaming, so names are matched against the
    /// standardized columns; `Customer ID` finds `customer_id`.
    pub fn dedup_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dedup_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Set a fixed cardinality threshold for categorical columns.
    pub fn cardinality_threshold(mut self, threshold: usize) -> Self {
        self.cardinality_threshold = Some(threshold);
        self
    }

    /// Replace the accepted date formats (chrono `strftime` patterns).
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Set how many missing dates per column are reported individually.
    pub fn missing_date_report_cap(mut self, cap: usize) -> Self {
        self.missing_date_report_cap = Some(cap);
        self
    }

    /// Set the share of cells that must agree on a type.
    ///
    /// # Arguments
    /// * `agreement` - Value in (0.0, 1.0] (e.g., 0.9 = 90%)
    pub fn type_agreement(mut self, agreement: f64) -> Self {
        self.type_agreement = Some(agreement);
        self
    }

    /// Set the placeholder written into missing text and categorical cells.
    pub fn fill_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.fill_placeholder = Some(placeholder.into());
        self
    }

    /// Trim surrounding whitespace from text cells before profiling.
    pub fn trim_text(mut self, trim: bool) -> Self {
        self.trim_text = Some(trim);
        self
    }

    /// Treat empty text cells as missing.
    pub fn blank_as_missing(mut self, blank: bool) -> Self {
        self.blank_as_missing = Some(blank);
        self
    }

    /// Set the columns that must be present and complete.
    pub fn required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            dedup_key: self.dedup_key,
            remove_duplicates: self.remove_duplicates.unwrap_or(defaults.remove_duplicates),
            cardinality_threshold: self.cardinality_threshold,
            date_formats: self.date_formats.unwrap_or(defaults.date_formats),
            missing_date_report_cap: self
                .missing_date_report_cap
                .unwrap_or(defaults.missing_date_report_cap),
            type_agreement: self.type_agreement.unwrap_or(defaults.type_agreement),
            fill_placeholder: self.fill_placeholder.unwrap_or(defaults.fill_placeholder),
            trim_text: self.trim_text.unwrap_or(defaults.trim_text),
            blank_as_missing: self.blank_as_missing.unwrap_or(defaults.blank_as_missing),
            required_columns: self.required_columns.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
