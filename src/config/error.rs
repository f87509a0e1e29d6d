use std::fmt;

use thiserror::Error;

/// Maximum number of offending values carried by an error.
pub const MAX_SAMPLES: usize = 5;

/// Which required selection is missing at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Date,
    DisplayBand,
    Bands,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Date => write!(f, "the date column"),
            Selection::DisplayBand => write!(f, "the display band column"),
            Selection::Bands => write!(f, "at least one band"),
        }
    }
}

/// Everything that can reject a submission.
///
/// All variants are raised before synthesis starts; synthesis itself cannot
/// fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Date data is empty")]
    EmptyDateData,

    #[error("Date format error: {value}")]
    DateFormat { value: String },

    #[error("Date value is out of the valid range (700000-800000): {}", .samples.join(", "))]
    DateOutOfRange { samples: Vec<String> },

    #[error("Unsupported date value: {value}")]
    UnsupportedDateType { value: String },

    #[error("Please select {0}")]
    MissingSelection(Selection),

    #[error("Please select the QA column")]
    MissingQaSelection,

    #[error("P_CG must be a float in the range (0.0, 1.0), got '{value}'")]
    InvalidProbability { value: String },

    #[error("CONSE must be an integer in the range [1, 8], got '{value}'")]
    InvalidConsecutiveCount { value: String },

    #[error("Lam must be a valid number, got '{value}'")]
    InvalidLambda { value: String },

    #[error("Band column '{column}' contains non-integer values: {}", .samples.join(", "))]
    NonIntegerBandColumn { column: String, samples: Vec<String> },
}

impl ConfigError {
    /// The input field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            ConfigError::EmptyDateData
            | ConfigError::DateFormat { .. }
            | ConfigError::DateOutOfRange { .. }
            | ConfigError::UnsupportedDateType { .. }
            | ConfigError::MissingSelection(Selection::Date) => "date_column",
            ConfigError::MissingSelection(Selection::DisplayBand) => "display_band",
            ConfigError::MissingSelection(Selection::Bands) => "bands",
            ConfigError::MissingQaSelection => "qa_column",
            ConfigError::InvalidProbability { .. } => "p_change_prob",
            ConfigError::InvalidConsecutiveCount { .. } => "consecutive_obs",
            ConfigError::InvalidLambda { .. } => "lambda",
            ConfigError::NonIntegerBandColumn { column, .. } => column,
        }
    }
}
