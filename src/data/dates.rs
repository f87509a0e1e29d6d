use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::CellValue;
use crate::config::error::{ConfigError, MAX_SAMPLES};

/// Lowest accepted ordinal day (year 1918).
pub const MIN_ORDINAL: i64 = 700_000;
/// Highest accepted ordinal day (year 2191).
pub const MAX_ORDINAL: i64 = 800_000;

/// The format users are expected to type; tried before anything else.
const PRIMARY_FORMAT: &str = "%m/%d/%Y";

/// Fallback date formats, tried in order. Numeric formats are month-first,
/// like the default `pd.to_datetime` in generated scripts.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m.%d.%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Fallback date-time formats; the time part is dropped.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Proleptic Gregorian ordinal, 0001-01-01 being day 1.
pub fn ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Calendar date of an ordinal day, if representable.
pub fn from_ordinal(day: i64) -> Option<NaiveDate> {
    i32::try_from(day).ok().and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// chrono's `%Y` also matches one- to three-digit years; such a match is
/// left to the `%y` formats instead.
fn full_year(fmt: &str, date: NaiveDate) -> bool {
    !fmt.contains("%Y") || date.year() >= 1000
}

/// Parse a textual date: `MM/DD/YYYY` first, then the general formats.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    let dates = std::iter::once(PRIMARY_FORMAT)
        .chain(DATE_FORMATS)
        .filter_map(|fmt| {
            NaiveDate::parse_from_str(s, fmt)
                .ok()
                .filter(|d| full_year(fmt, *d))
        });
    let datetimes = DATETIME_FORMATS.into_iter().filter_map(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .map(|dt| dt.date())
            .filter(|d| full_year(fmt, *d))
    });
    if let Some(d) = dates.chain(datetimes).next() {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DateKind {
    Numeric,
    Text,
}

fn kind_of(value: &CellValue) -> Option<DateKind> {
    match value {
        CellValue::Integer(_) | CellValue::Float(_) => Some(DateKind::Numeric),
        CellValue::Text(_) => Some(DateKind::Text),
        CellValue::Bool(_) | CellValue::Null => None,
    }
}

/// Convert a date column into ordinal day numbers.
///
/// The first cell decides how the column is read: numeric columns must
/// already hold ordinals, text columns are parsed and converted. Cells of any
/// other kind fail the whole column. Every resulting ordinal must fall inside
/// [`MIN_ORDINAL`]..=[`MAX_ORDINAL`]; up to five offenders are reported.
pub fn normalize(values: &[CellValue]) -> Result<Vec<i64>, ConfigError> {
    let Some(first) = values.first() else {
        return Err(ConfigError::EmptyDateData);
    };
    let kind = kind_of(first).ok_or_else(|| ConfigError::UnsupportedDateType {
        value: first.to_string(),
    })?;

    let mut days = Vec::with_capacity(values.len());
    let mut out_of_range = Vec::new();

    for value in values {
        let day = match (kind, value) {
            (DateKind::Numeric, CellValue::Integer(i)) => Some(*i),
            // Fractional ordinals are truncated; NaN/inf cannot be a day.
            (DateKind::Numeric, CellValue::Float(f)) => f.is_finite().then(|| f.trunc() as i64),
            (DateKind::Text, CellValue::Text(s)) => {
                let date = parse_date_text(s).ok_or_else(|| ConfigError::DateFormat {
                    value: s.clone(),
                })?;
                Some(ordinal(date))
            }
            _ => {
                return Err(ConfigError::UnsupportedDateType {
                    value: value.to_string(),
                })
            }
        };
        match day {
            Some(d) if (MIN_ORDINAL..=MAX_ORDINAL).contains(&d) => days.push(d),
            _ if out_of_range.len() >= MAX_SAMPLES => {}
            Some(d) => out_of_range.push(d.to_string()),
            None => out_of_range.push(value.to_string()),
        }
    }

    if !out_of_range.is_empty() {
        log::debug!("{} date samples out of range", out_of_range.len());
        return Err(ConfigError::DateOutOfRange {
            samples: out_of_range,
        });
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn numeric_ordinal_passes_through() {
        assert_eq!(normalize(&[CellValue::Integer(733042)]).unwrap(), vec![733042]);
    }

    #[test]
    fn us_date_text_converts_to_ordinal() {
        let days = normalize(&[text("01/01/2008")]).unwrap();
        assert_eq!(days, vec![733042]);
        assert!((MIN_ORDINAL..=MAX_ORDINAL).contains(&days[0]));
    }

    #[test]
    fn unpadded_and_general_formats_parse() {
        let days = normalize(&[text("8/1/1979"), text("1979-08-02"), text("2008-01-01T10:30:00")])
            .unwrap();
        assert_eq!(days, vec![722662, 722663, 733042]);
    }

    #[test]
    fn two_digit_years_use_short_year_format() {
        assert_eq!(parse_date_text("01/01/08"), NaiveDate::from_ymd_opt(2008, 1, 1));
        assert_eq!(normalize(&[text("01/01/08")]).unwrap(), vec![733042]);
        assert_eq!(parse_date_text("01/01/0008"), None);
    }

    #[test]
    fn dotted_dates_are_month_first() {
        assert_eq!(parse_date_text("01.02.2008"), NaiveDate::from_ymd_opt(2008, 1, 2));
        assert_eq!(parse_date_text("13.02.2008"), None);
    }

    #[test]
    fn ordinal_round_trips_through_calendar() {
        let d = NaiveDate::from_ymd_opt(2008, 1, 1).unwrap();
        assert_eq!(from_ordinal(ordinal(d)), Some(d));
        assert_eq!(ordinal(NaiveDate::from_ymd_opt(1, 1, 1).unwrap()), 1);
    }

    #[test]
    fn below_range_is_rejected() {
        assert!(matches!(
            normalize(&[CellValue::Integer(699999)]),
            Err(ConfigError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn out_of_range_reports_at_most_five() {
        let values: Vec<CellValue> = (0..8).map(|i| text(&format!("01/0{}/1900", i + 1))).collect();
        match normalize(&values) {
            Err(ConfigError::DateOutOfRange { samples }) => assert_eq!(samples.len(), 5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_text_is_a_format_error() {
        assert_eq!(
            normalize(&[text("01/01/2008"), text("not a date")]),
            Err(ConfigError::DateFormat {
                value: "not a date".into()
            })
        );
    }

    #[test]
    fn mixed_kinds_are_unsupported() {
        assert!(matches!(
            normalize(&[text("01/01/2008"), CellValue::Integer(733042)]),
            Err(ConfigError::UnsupportedDateType { .. })
        ));
        assert!(matches!(
            normalize(&[CellValue::Integer(733042), CellValue::Null]),
            Err(ConfigError::UnsupportedDateType { .. })
        ));
        assert!(matches!(
            normalize(&[CellValue::Bool(true)]),
            Err(ConfigError::UnsupportedDateType { .. })
        ));
    }

    #[test]
    fn empty_column_is_an_error() {
        assert_eq!(normalize(&[]), Err(ConfigError::EmptyDateData));
    }

    #[test]
    fn float_ordinals_are_truncated() {
        assert_eq!(
            normalize(&[CellValue::Float(733042.0), CellValue::Float(733043.7)]).unwrap(),
            vec![733042, 733043]
        );
        assert!(matches!(
            normalize(&[CellValue::Float(f64::NAN)]),
            Err(ConfigError::DateOutOfRange { .. })
        ));
    }
}
