//! Analysis configuration: column roles, parameters and their validation.
//!
//! ```text
//!  ColumnSelection ──(roles)──┐
//!                             ├── resolve / validate ──► ResolvedColumns + ParameterSet
//!  RawParameters ─────────────┘
//! ```

pub mod error;
pub mod params;
pub mod selection;

use error::{ConfigError, Selection};
use selection::ColumnRoles;

// ---------------------------------------------------------------------------
// ResolvedColumns – role assignment after submission checks
// ---------------------------------------------------------------------------

/// Column roles with every required selection present.
///
/// Only [`ResolvedColumns::resolve`] builds one, so holding a value means the
/// display and break-indicator bands index into `bands`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    date_column: String,
    qa_column: Option<String>,
    bands: Vec<String>,
    display_index: usize,
    indicator_index: usize,
}

impl ResolvedColumns {
    pub fn resolve(roles: &ColumnRoles) -> Result<Self, ConfigError> {
        let date_column = roles
            .date_column()
            .ok_or(ConfigError::MissingSelection(Selection::Date))?;
        let display_band = roles
            .display_band()
            .ok_or(ConfigError::MissingSelection(Selection::DisplayBand))?;
        if roles.bands().is_empty() {
            return Err(ConfigError::MissingSelection(Selection::Bands));
        }
        if roles.qa_enabled() && roles.qa_column().is_none() {
            return Err(ConfigError::MissingQaSelection);
        }

        let position = |name: &str| roles.bands().iter().position(|b| b == name);
        let display_index =
            position(display_band).ok_or(ConfigError::MissingSelection(Selection::DisplayBand))?;
        let indicator_index = roles
            .break_indicator_band()
            .and_then(position)
            .unwrap_or(display_index);

        Ok(Self {
            date_column: date_column.to_string(),
            qa_column: roles.qa_column().map(str::to_string),
            bands: roles.bands().to_vec(),
            display_index,
            indicator_index,
        })
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn qa_column(&self) -> Option<&str> {
        self.qa_column.as_deref()
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    pub fn display_index(&self) -> usize {
        self.display_index
    }

    pub fn indicator_index(&self) -> usize {
        self.indicator_index
    }

    pub fn display_band(&self) -> &str {
        &self.bands[self.display_index]
    }

    pub fn break_indicator_band(&self) -> &str {
        &self.bands[self.indicator_index]
    }
}
