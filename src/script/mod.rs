//! Script synthesis: turn a validated configuration into a runnable Python
//! script driving `pyxccd` and its plots.
//!
//! The script is assembled from fixed text blocks:
//! ```text
//!   header (comment + configuration summary)
//!   prelude.py   imports, date conversion, plotting helpers
//!   data.py      load the source table, build dates / ts_stack / qas
//!   <variant>.py engine call(s) + renderer for the selected combination
//! ```
//! Placeholders (`{{NAME}}`) are filled with Python literals only, so the
//! same configuration always yields the same bytes.

pub mod literal;

use serde::Serialize;

use crate::config::ResolvedColumns;
use crate::config::params::{FittingCurve, Method, OutputMode, ParameterSet};
use literal::{py_bool, py_float, py_opt_str, py_str, py_str_list};

const PRELUDE: &str = include_str!("templates/prelude.py");
const DATA_SECTION: &str = include_str!("templates/data.py");

// ---------------------------------------------------------------------------
// Dispatch table
// ---------------------------------------------------------------------------

/// One engine/renderer combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    ColdBreaks,
    SccdBreaksStates,
    SccdBreaksCoefficients,
    SccdStateComponents,
    SccdAnomalyStates,
    SccdAnomalyCoefficients,
}

/// Call templates, indexed by `Variant as usize`.
const CALL_TEMPLATES: [(Variant, &str); 6] = [
    (Variant::ColdBreaks, include_str!("templates/cold_breaks.py")),
    (Variant::SccdBreaksStates, include_str!("templates/sccd_breaks_states.py")),
    (
        Variant::SccdBreaksCoefficients,
        include_str!("templates/sccd_breaks_coefficients.py"),
    ),
    (
        Variant::SccdStateComponents,
        include_str!("templates/sccd_state_components.py"),
    ),
    (Variant::SccdAnomalyStates, include_str!("templates/sccd_anomaly_states.py")),
    (
        Variant::SccdAnomalyCoefficients,
        include_str!("templates/sccd_anomaly_coefficients.py"),
    ),
];

impl Variant {
    /// Pick the row for a normalized parameter set.
    pub fn select(params: &ParameterSet) -> Variant {
        let uses_states = params.fitting_curve == Some(FittingCurve::States);
        match (params.method, params.output_mode) {
            (Method::Cold, _) => Variant::ColdBreaks,
            (Method::Sccd, OutputMode::Breaks) if uses_states => Variant::SccdBreaksStates,
            (Method::Sccd, OutputMode::Breaks) => Variant::SccdBreaksCoefficients,
            (Method::Sccd, OutputMode::StateComponents) => Variant::SccdStateComponents,
            (Method::Sccd, OutputMode::Anomaly) if uses_states => Variant::SccdAnomalyStates,
            (Method::Sccd, OutputMode::Anomaly) => Variant::SccdAnomalyCoefficients,
        }
    }

    fn call_template(self) -> &'static str {
        CALL_TEMPLATES[self as usize].1
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// A synthesized analysis script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub variant: Variant,
    pub text: String,
}

/// Summary embedded as a JSON comment in the script header.
#[derive(Serialize)]
struct Summary<'a> {
    source: &'a str,
    date_column: &'a str,
    qa_column: Option<&'a str>,
    bands: &'a [String],
    display_band: &'a str,
    break_indicator_band: &'a str,
    variant: Variant,
    params: &'a ParameterSet,
}

/// Render the script for `columns` and `params`, reading `source_path`.
pub fn synthesize(columns: &ResolvedColumns, params: &ParameterSet, source_path: &str) -> Script {
    let variant = Variant::select(params);
    log::debug!("synthesizing {variant:?} for {source_path}");

    let summary = Summary {
        source: source_path,
        date_column: columns.date_column(),
        qa_column: columns.qa_column(),
        bands: columns.bands(),
        display_band: columns.display_band(),
        break_indicator_band: columns.break_indicator_band(),
        variant,
        params,
    };
    let summary_json = serde_json::to_string(&summary).unwrap_or_else(|e| {
        log::warn!("configuration summary left empty: {e}");
        String::new()
    });

    let fitting_coefs = params.fitting_curve == Some(FittingCurve::Lasso);
    let panels = if params.trimodal { 5 } else { 4 };
    let vars: [(&str, String); 13] = [
        ("SOURCE_PATH", py_str(source_path)),
        ("DATE_COLUMN", py_str(columns.date_column())),
        ("QA_COLUMN", py_opt_str(columns.qa_column())),
        ("BANDS", py_str_list(columns.bands())),
        ("DISPLAY_BAND", py_str(columns.display_band())),
        ("DISPLAY_INDEX", columns.display_index().to_string()),
        ("INDICATOR_INDEX", columns.indicator_index().to_string()),
        ("LAMBDA", py_float(params.lambda)),
        ("P_CG", py_float(params.p_change_prob)),
        ("CONSE", params.consecutive_obs.to_string()),
        ("FITTING_COEFS", py_bool(fitting_coefs).to_string()),
        ("TRIMODAL", py_bool(params.trimodal).to_string()),
        ("PANELS", panels.to_string()),
    ];

    let mut text = String::new();
    text.push_str(&format!(
        "# {} / {} analysis generated by xccd-launcher\n# configuration: {}\n\n",
        params.method, params.output_mode, summary_json
    ));
    text.push_str(PRELUDE);
    text.push_str("\n\n");
    text.push_str(&render(DATA_SECTION, &vars));
    text.push('\n');
    text.push_str(&render(variant.call_template(), &vars));

    Script { variant, text }
}

/// Replace every `{{NAME}}` placeholder with its value.
fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::params::{RawParameters, validate};
    use crate::config::selection::ColumnSelection;

    fn selection() -> ColumnSelection {
        let mut sel = ColumnSelection::default();
        sel.load(vec!["d".into(), "b1".into(), "b2".into(), "qa".into()]);
        sel.set_date("d");
        sel.add_band("b1");
        sel.add_band("b2");
        sel.set_break_indicator_band("b2");
        sel
    }

    fn build(sel: &ColumnSelection, raw: &RawParameters) -> Script {
        let params = validate(raw, sel.roles()).unwrap();
        let columns = ResolvedColumns::resolve(sel.roles()).unwrap();
        synthesize(&columns, &params, "/data/series.csv")
    }

    fn raw(method: Method, output_mode: OutputMode, fitting_curve: FittingCurve) -> RawParameters {
        RawParameters {
            method,
            output_mode,
            fitting_curve,
            ..RawParameters::default()
        }
    }

    #[test]
    fn call_templates_are_indexed_by_variant() {
        for (i, (variant, _)) in CALL_TEMPLATES.iter().enumerate() {
            assert_eq!(*variant as usize, i);
            assert_eq!(variant.call_template(), CALL_TEMPLATES[i].1);
        }
    }

    #[test]
    fn cold_end_to_end() {
        let cold = RawParameters {
            method: Method::Cold,
            p_change_prob: "0.99".into(),
            consecutive_obs: "6".into(),
            lambda: "20".into(),
            ..RawParameters::default()
        };
        let script = build(&selection(), &cold);
        assert_eq!(script.variant, Variant::ColdBreaks);

        let text = &script.text;
        assert!(text.contains(
            "cold_result = cold_detect_flex(dates, ts_stack, qas, 20.0, p_cg=0.99, conse=6)"
        ));
        assert!(text.contains("in_path = '/data/series.csv'"));
        assert!(text.contains("date_column = 'd'"));
        assert!(text.contains("qa_column = None"));
        assert!(text.contains("band_names = ['b1', 'b2']"));
        assert!(text.contains("band_index=0,"));
        assert!(text.contains("indicator_band_index=1,"));
        assert!(!text.contains("sccd_detect_flex("));
        assert!(!text.contains("output_anomaly"));
        assert!(!text.contains("state_intervaldays"));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn dispatch_covers_every_combination() {
        let sel = selection();
        for method in Method::ALL {
            for output in OutputMode::ALL {
                for curve in FittingCurve::ALL {
                    let script = build(&sel, &raw(method, output, curve));
                    let expected = match (method, output, curve) {
                        (Method::Cold, _, _) => Variant::ColdBreaks,
                        (_, OutputMode::Breaks, FittingCurve::States) => Variant::SccdBreaksStates,
                        (_, OutputMode::Breaks, _) => Variant::SccdBreaksCoefficients,
                        (_, OutputMode::StateComponents, _) => Variant::SccdStateComponents,
                        (_, OutputMode::Anomaly, FittingCurve::States) => Variant::SccdAnomalyStates,
                        (_, OutputMode::Anomaly, _) => Variant::SccdAnomalyCoefficients,
                    };
                    assert_eq!(script.variant, expected, "{method} {output} {curve}");
                    assert!(!script.text.contains("{{"), "{expected:?}");
                }
            }
        }
    }

    #[test]
    fn engine_call_shapes_match_variant() {
        let sel = selection();
        let calls = |s: &Script| s.text.matches("sccd_detect_flex(dates").count();

        let anomaly_states = build(&sel, &raw(Method::Sccd, OutputMode::Anomaly, FittingCurve::States));
        assert_eq!(calls(&anomaly_states), 2);
        assert!(anomaly_states.text.contains("output_anomaly=True"));
        assert!(anomaly_states.text.contains("state_intervaldays=1"));
        assert!(anomaly_states.text.contains("states=states,"));

        let anomaly_lasso = build(&sel, &raw(Method::Sccd, OutputMode::Anomaly, FittingCurve::Lasso));
        assert_eq!(calls(&anomaly_lasso), 1);
        assert!(anomaly_lasso.text.contains("fitting_coefs=True"));
        assert!(!anomaly_lasso.text.contains("state_intervaldays"));

        let breaks_kalman = build(&sel, &raw(Method::Sccd, OutputMode::Breaks, FittingCurve::Kalman));
        assert_eq!(calls(&breaks_kalman), 1);
        assert!(breaks_kalman.text.contains("fitting_coefs=False"));
        assert!(breaks_kalman.text.contains("output_anomaly=False"));

        let components = build(&sel, &raw(Method::Sccd, OutputMode::StateComponents, FittingCurve::Lasso));
        assert!(components.text.contains("plt.subplots(5, 1"));
        assert!(components.text.contains("band_name='b1',"));
        assert!(components.text.contains("fitting_coefs=False"));
    }

    #[test]
    fn trimodal_off_uses_four_panels() {
        let params = RawParameters {
            output_mode: OutputMode::StateComponents,
            trimodal: false,
            ..RawParameters::default()
        };
        let script = build(&selection(), &params);
        assert!(script.text.contains("plt.subplots(4, 1"));
        assert!(script.text.contains("trimodal=False"));
    }

    #[test]
    fn qa_column_is_inlined_when_enabled() {
        let mut sel = selection();
        sel.set_qa_enabled(true);
        sel.set_qa("qa");
        let script = build(&sel, &RawParameters::default());
        assert!(script.text.contains("qa_column = 'qa'"));
        assert!(script.text.contains(r#""qa_column":"qa""#));
    }

    #[test]
    fn header_carries_configuration_json() {
        let script = build(&selection(), &RawParameters::default());
        let line = script
            .text
            .lines()
            .find_map(|l| l.strip_prefix("# configuration: "))
            .unwrap();
        let summary: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(summary["bands"], serde_json::json!(["b1", "b2"]));
        assert_eq!(summary["params"]["method"], "S-CCD");
        assert_eq!(summary["variant"], "sccd_breaks_coefficients");
    }

    #[test]
    fn synthesis_is_deterministic() {
        let sel = selection();
        for method in Method::ALL {
            for output in OutputMode::ALL {
                for curve in FittingCurve::ALL {
                    let params = raw(method, output, curve);
                    assert_eq!(build(&sel, &params), build(&sel, &params));
                }
            }
        }
    }

    #[test]
    fn render_replaces_all_occurrences() {
        let out = render("{{A}} and {{A}} {{B}}", &[("A", "1".into()), ("B", "2".into())]);
        assert_eq!(out, "1 and 1 2");
    }
}
