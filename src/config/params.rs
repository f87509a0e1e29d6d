use std::fmt;

use serde::Serialize;

use super::error::ConfigError;
use super::selection::ColumnRoles;
use super::ResolvedColumns;

// ---------------------------------------------------------------------------
// Categorical parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    #[serde(rename = "COLD")]
    Cold,
    #[serde(rename = "S-CCD")]
    Sccd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Breaks,
    StateComponents,
    Anomaly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FittingCurve {
    Lasso,
    Kalman,
    States,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Sccd, Method::Cold];
}

impl OutputMode {
    pub const ALL: [OutputMode; 3] = [
        OutputMode::Breaks,
        OutputMode::StateComponents,
        OutputMode::Anomaly,
    ];
}

impl FittingCurve {
    pub const ALL: [FittingCurve; 3] = [
        FittingCurve::Lasso,
        FittingCurve::Kalman,
        FittingCurve::States,
    ];
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Cold => write!(f, "COLD"),
            Method::Sccd => write!(f, "S-CCD"),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Breaks => write!(f, "breaks"),
            OutputMode::StateComponents => write!(f, "state_components"),
            OutputMode::Anomaly => write!(f, "anomaly"),
        }
    }
}

impl fmt::Display for FittingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FittingCurve::Lasso => write!(f, "Lasso regression"),
            FittingCurve::Kalman => write!(f, "Kalman Filter"),
            FittingCurve::States => write!(f, "States"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawParameters – what the form currently holds
// ---------------------------------------------------------------------------

/// Unvalidated parameter form. Numeric fields are kept as typed text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameters {
    pub method: Method,
    pub output_mode: OutputMode,
    pub fitting_curve: FittingCurve,
    pub p_change_prob: String,
    pub consecutive_obs: String,
    pub lambda: String,
    pub trimodal: bool,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self {
            method: Method::Sccd,
            output_mode: OutputMode::Breaks,
            fitting_curve: FittingCurve::Lasso,
            p_change_prob: "0.99".to_string(),
            consecutive_obs: "6".to_string(),
            lambda: "20".to_string(),
            trimodal: true,
        }
    }
}

impl RawParameters {
    /// Switch method. COLD only produces breaks.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
        if method == Method::Cold {
            self.output_mode = OutputMode::Breaks;
        }
    }

    /// Switch output. State components are only available from the states
    /// curve.
    pub fn set_output_mode(&mut self, output_mode: OutputMode) {
        if self.method == Method::Cold {
            return;
        }
        self.output_mode = output_mode;
        if output_mode == OutputMode::StateComponents {
            self.fitting_curve = FittingCurve::States;
        }
    }

    pub fn set_fitting_curve(&mut self, curve: FittingCurve) {
        if self.fitting_curve_editable() {
            self.fitting_curve = curve;
        }
    }

    pub fn output_mode_editable(&self) -> bool {
        self.method == Method::Sccd
    }

    pub fn trimodal_editable(&self) -> bool {
        self.method == Method::Sccd
    }

    pub fn fitting_curve_editable(&self) -> bool {
        self.method == Method::Sccd && self.output_mode != OutputMode::StateComponents
    }
}

// ---------------------------------------------------------------------------
// ParameterSet – validated, normalized parameters
// ---------------------------------------------------------------------------

/// Parameters after validation. Under COLD there is no fitting-curve choice
/// and no trimodal term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    pub method: Method,
    pub output_mode: OutputMode,
    pub fitting_curve: Option<FittingCurve>,
    pub p_change_prob: f64,
    pub consecutive_obs: u8,
    pub lambda: f64,
    pub trimodal: bool,
}

/// Validate the form against the current column roles.
///
/// Selections are checked before numbers, in the order a user fills the form.
pub fn validate(raw: &RawParameters, roles: &ColumnRoles) -> Result<ParameterSet, ConfigError> {
    ResolvedColumns::resolve(roles)?;

    let p_change_prob = parse_probability(&raw.p_change_prob)?;
    let consecutive_obs = parse_consecutive(&raw.consecutive_obs)?;
    let lambda = raw
        .lambda
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidLambda {
            value: raw.lambda.clone(),
        })?;

    let (output_mode, fitting_curve, trimodal) = match raw.method {
        Method::Cold => (OutputMode::Breaks, None, false),
        Method::Sccd => {
            let curve = if raw.output_mode == OutputMode::StateComponents {
                FittingCurve::States
            } else {
                raw.fitting_curve
            };
            (raw.output_mode, Some(curve), raw.trimodal)
        }
    };

    Ok(ParameterSet {
        method: raw.method,
        output_mode,
        fitting_curve,
        p_change_prob,
        consecutive_obs,
        lambda,
        trimodal,
    })
}

fn parse_probability(text: &str) -> Result<f64, ConfigError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| *p > 0.0 && *p < 1.0)
        .ok_or_else(|| ConfigError::InvalidProbability {
            value: text.to_string(),
        })
}

fn parse_consecutive(text: &str) -> Result<u8, ConfigError> {
    text.trim()
        .parse::<u8>()
        .ok()
        .filter(|n| (1..=8).contains(n))
        .ok_or_else(|| ConfigError::InvalidConsecutiveCount {
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::Selection;
    use crate::config::selection::ColumnSelection;

    fn roles() -> ColumnRoles {
        let mut sel = ColumnSelection::default();
        sel.load(vec!["dates".into(), "qa".into(), "red".into(), "nir".into()]);
        sel.set_date("dates");
        sel.add_band("red");
        sel.add_band("nir");
        sel.roles().clone()
    }

    fn raw_with(f: impl FnOnce(&mut RawParameters)) -> RawParameters {
        let mut raw = RawParameters::default();
        f(&mut raw);
        raw
    }

    #[test]
    fn defaults_validate() {
        let params = validate(&RawParameters::default(), &roles()).unwrap();
        assert_eq!(params.method, Method::Sccd);
        assert_eq!(params.fitting_curve, Some(FittingCurve::Lasso));
        assert_eq!(params.p_change_prob, 0.99);
        assert_eq!(params.consecutive_obs, 6);
        assert_eq!(params.lambda, 20.0);
        assert!(params.trimodal);
    }

    #[test]
    fn probability_bounds_are_exclusive() {
        for bad in ["1.0", "0", "0.0", "-0.5", "abc", "", "NaN"] {
            let raw = raw_with(|r| r.p_change_prob = bad.into());
            assert!(
                matches!(validate(&raw, &roles()), Err(ConfigError::InvalidProbability { .. })),
                "{bad}"
            );
        }
        let raw = raw_with(|r| r.p_change_prob = " 0.95 ".into());
        assert_eq!(validate(&raw, &roles()).unwrap().p_change_prob, 0.95);
    }

    #[test]
    fn consecutive_count_range() {
        for bad in ["0", "9", "-1", "6.0", "six"] {
            let raw = raw_with(|r| r.consecutive_obs = bad.into());
            assert!(
                matches!(
                    validate(&raw, &roles()),
                    Err(ConfigError::InvalidConsecutiveCount { .. })
                ),
                "{bad}"
            );
        }
        for good in ["1", "8"] {
            let raw = raw_with(|r| r.consecutive_obs = good.into());
            assert!(validate(&raw, &roles()).is_ok(), "{good}");
        }
    }

    #[test]
    fn lambda_must_be_a_finite_number() {
        for bad in ["", "twenty", "inf"] {
            let raw = raw_with(|r| r.lambda = bad.into());
            assert!(matches!(
                validate(&raw, &roles()),
                Err(ConfigError::InvalidLambda { .. })
            ));
        }
        let raw = raw_with(|r| r.lambda = "0.5".into());
        assert_eq!(validate(&raw, &roles()).unwrap().lambda, 0.5);
    }

    #[test]
    fn missing_selections_are_reported_in_order() {
        let empty = ColumnRoles::default();
        assert_eq!(
            validate(&RawParameters::default(), &empty),
            Err(ConfigError::MissingSelection(Selection::Date))
        );

        let mut sel = ColumnSelection::default();
        sel.load(vec!["dates".into(), "red".into()]);
        sel.set_date("dates");
        assert_eq!(
            validate(&RawParameters::default(), sel.roles()),
            Err(ConfigError::MissingSelection(Selection::DisplayBand))
        );
    }

    #[test]
    fn qa_enabled_without_column_is_rejected() {
        let mut sel = ColumnSelection::default();
        sel.load(vec!["dates".into(), "qa".into(), "red".into()]);
        sel.set_date("dates");
        sel.add_band("red");
        sel.set_qa_enabled(true);
        assert_eq!(
            validate(&RawParameters::default(), sel.roles()),
            Err(ConfigError::MissingQaSelection)
        );
        sel.set_qa("qa");
        assert!(validate(&RawParameters::default(), sel.roles()).is_ok());
    }

    #[test]
    fn cold_normalizes_sccd_only_fields() {
        let raw = RawParameters {
            method: Method::Cold,
            output_mode: OutputMode::Anomaly,
            fitting_curve: FittingCurve::Kalman,
            trimodal: true,
            ..RawParameters::default()
        };
        let params = validate(&raw, &roles()).unwrap();
        assert_eq!(params.output_mode, OutputMode::Breaks);
        assert_eq!(params.fitting_curve, None);
        assert!(!params.trimodal);
    }

    #[test]
    fn state_components_force_states_curve() {
        let raw = RawParameters {
            method: Method::Sccd,
            output_mode: OutputMode::StateComponents,
            fitting_curve: FittingCurve::Lasso,
            ..RawParameters::default()
        };
        let params = validate(&raw, &roles()).unwrap();
        assert_eq!(params.fitting_curve, Some(FittingCurve::States));
    }

    #[test]
    fn form_locks_follow_method_and_output() {
        let mut raw = RawParameters::default();
        raw.set_output_mode(OutputMode::StateComponents);
        assert_eq!(raw.fitting_curve, FittingCurve::States);
        raw.set_fitting_curve(FittingCurve::Kalman);
        assert_eq!(raw.fitting_curve, FittingCurve::States);

        raw.set_output_mode(OutputMode::Anomaly);
        raw.set_fitting_curve(FittingCurve::Kalman);
        assert_eq!(raw.fitting_curve, FittingCurve::Kalman);

        raw.set_method(Method::Cold);
        assert_eq!(raw.output_mode, OutputMode::Breaks);
        assert!(!raw.output_mode_editable());
        assert!(!raw.trimodal_editable());
        raw.set_output_mode(OutputMode::Anomaly);
        assert_eq!(raw.output_mode, OutputMode::Breaks);
    }
}
