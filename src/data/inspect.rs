use super::model::{CellValue, Column, Dataset};
use crate::config::error::{ConfigError, MAX_SAMPLES};
use crate::config::selection::ColumnRoles;

// ---------------------------------------------------------------------------
// Column inspection: advisory checks on the loaded table
// ---------------------------------------------------------------------------

/// Whether a cell is acceptable inside an integer band column.
///
/// Nulls are allowed; the engine masks them through the QA column.
fn is_integer_cell(value: &CellValue) -> bool {
    match value {
        CellValue::Integer(_) | CellValue::Null => true,
        CellValue::Float(f) => f.fract() == 0.0,
        CellValue::Text(_) | CellValue::Bool(_) => false,
    }
}

/// Up to [`MAX_SAMPLES`] cells of `column` that are not integers.
pub fn non_integer_samples(column: &Column) -> Vec<String> {
    column
        .values
        .iter()
        .filter(|v| !is_integer_cell(v))
        .take(MAX_SAMPLES)
        .map(ToString::to_string)
        .collect()
}

/// Warn about selected band columns holding non-integer values.
///
/// The engine expects integer-scaled reflectance; other values still run, so
/// these are warnings rather than submission errors.
pub fn diagnose_bands(dataset: &Dataset, roles: &ColumnRoles) -> Vec<ConfigError> {
    roles
        .bands()
        .iter()
        .filter_map(|band| dataset.column(band))
        .filter_map(|column| {
            let samples = non_integer_samples(column);
            if samples.is_empty() {
                None
            } else {
                Some(ConfigError::NonIntegerBandColumn {
                    column: column.name.clone(),
                    samples,
                })
            }
        })
        .collect()
}

/// Numeric values of a column paired with row indices, for previews.
pub fn numeric_series(column: &Column) -> Vec<(usize, f64)> {
    column
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.as_f64().map(|y| (i, y)))
        .collect()
}
