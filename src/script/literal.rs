//! Python literal rendering for values inlined into generated scripts.

use std::fmt::Write;

/// Single-quoted Python string literal.
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Python list of string literals.
pub fn py_str_list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| py_str(s)).collect();
    format!("[{}]", inner.join(", "))
}

/// Python float literal. `Debug` formatting always carries a decimal point or
/// exponent and round-trips exactly.
pub fn py_float(v: f64) -> String {
    format!("{v:?}")
}

pub fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

pub fn py_opt_str(s: Option<&str>) -> String {
    s.map_or_else(|| "None".to_string(), py_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_escaped() {
        assert_eq!(py_str(r"D:\data\it's.csv"), r"'D:\\data\\it\'s.csv'");
        assert_eq!(py_str("a\nb"), r"'a\nb'");
        assert_eq!(py_str("\u{1}"), r"'\x01'");
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(py_float(20.0), "20.0");
        assert_eq!(py_float(0.99), "0.99");
        assert_eq!(py_float(1e-7), "1e-7");
    }

    #[test]
    fn lists_and_options() {
        assert_eq!(py_str_list(&["b1".into(), "b2".into()]), "['b1', 'b2']");
        assert_eq!(py_str_list(&[]), "[]");
        assert_eq!(py_opt_str(None), "None");
        assert_eq!(py_opt_str(Some("qa")), "'qa'");
        assert_eq!(py_bool(true), "True");
    }
}
