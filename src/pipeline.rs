use crate::config::error::{ConfigError, Selection};
use crate::config::params::{RawParameters, validate};
use crate::config::selection::ColumnSelection;
use crate::config::ResolvedColumns;
use crate::data::dates;
use crate::data::inspect::diagnose_bands;
use crate::data::model::Dataset;
use crate::script::{Script, synthesize};

// ---------------------------------------------------------------------------
// Submission: validate → normalize dates → diagnose → synthesize
// ---------------------------------------------------------------------------

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub script: Script,
    /// Advisory findings that did not block the submission.
    pub diagnostics: Vec<ConfigError>,
}

/// Check the whole configuration against the loaded table and build the
/// script. The first failing check is returned; nothing is synthesized then.
pub fn submit(
    dataset: &Dataset,
    selection: &ColumnSelection,
    raw: &RawParameters,
) -> Result<Submission, ConfigError> {
    let roles = selection.roles();
    let params = validate(raw, roles)?;
    let columns = ResolvedColumns::resolve(roles)?;

    let date_values = &dataset
        .column(columns.date_column())
        .ok_or(ConfigError::MissingSelection(Selection::Date))?
        .values;
    let days = dates::normalize(date_values)?;
    log::debug!(
        "dates normalized: {} observations, {:?}..{:?}",
        days.len(),
        days.first(),
        days.last()
    );

    let diagnostics = diagnose_bands(dataset, roles);
    for warning in &diagnostics {
        log::warn!("{warning}");
    }

    let script = synthesize(&columns, &params, &dataset.source_display());
    log::info!(
        "submitted {} / {} with {} bands ({:?})",
        params.method,
        params.output_mode,
        columns.bands().len(),
        script.variant
    );
    Ok(Submission {
        script,
        diagnostics,
    })
}
